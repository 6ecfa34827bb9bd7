//! Video source boundary.
//!
//! `VideoSurface` is the shared target a decoder renders into: the producer
//! publishes a frame and raises the frame-ready flag, the render loop picks
//! the latest frame up on its next pass. `VideoPlayer` is a small local
//! producer that decodes animated GIFs (or a single still image) with the
//! `image` crate and paces them on a worker thread.

use crate::error::MediaError;
use crate::frame_ready::FrameReady;
use glam::Mat4;
use image::{AnimationDecoder, ImageFormat, RgbaImage};
use log::{debug, error, info};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Maps GL-style UVs (v = 1 at the top) onto top-down image rows.
pub const FLIP_V: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, -1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 1.0, 0.0, 1.0,
]);

// GIFs with a zero delay are shown at 10 fps, as browsers do.
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// A byte range of a local file holding the media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub path: PathBuf,
    pub offset: u64,
    /// `None` reads to the end of the file.
    pub length: Option<u64>,
}

impl MediaSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), offset: 0, length: None }
    }

    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn read(&self) -> Result<Vec<u8>, MediaError> {
        let mut file = File::open(&self.path).map_err(|source| MediaError::Open {
            path: self.path.clone(),
            source,
        })?;
        file.seek(SeekFrom::Start(self.offset))?;

        let mut bytes = Vec::new();
        match self.length {
            Some(length) => file.take(length).read_to_end(&mut bytes)?,
            None => file.read_to_end(&mut bytes)?,
        };
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        Ok(bytes)
    }
}

/// One decoded frame plus the texture transform that goes with it.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Arc<RgbaImage>,
    pub transform: Mat4,
}

impl VideoFrame {
    pub fn new(image: Arc<RgbaImage>) -> Self {
        Self { image, transform: FLIP_V }
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

type FrameListener = Box<dyn Fn() + Send>;

/// Shared frame target between a producer thread and the renderer.
#[derive(Default)]
pub struct VideoSurface {
    latest: Mutex<Option<VideoFrame>>,
    // last frame ever published, survives `take_frame`
    last_good: Mutex<Option<VideoFrame>>,
    ready: FrameReady,
    listener: Mutex<Option<FrameListener>>,
}

impl VideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every published frame, typically to wake the event loop.
    pub fn set_frame_listener(&self, listener: impl Fn() + Send + 'static) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(listener));
    }

    pub fn frame_ready(&self) -> &FrameReady {
        &self.ready
    }

    /// Producer side. A frame not yet consumed is replaced.
    pub fn publish(&self, frame: VideoFrame) {
        *self.last_good.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
        self.ready.mark_frame_available();
        if let Some(listener) = self.listener.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            listener();
        }
    }

    /// Consumer side, meant to run inside `FrameReady::consume_with`.
    pub fn take_frame(&self) -> Option<VideoFrame> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Queues the last published frame again, for a freshly created texture.
    /// A newer pending frame is left alone. Returns `false` if nothing was
    /// ever published.
    pub fn republish_last(&self) -> bool {
        let Some(last) = self.last_good.lock().unwrap_or_else(PoisonError::into_inner).clone() else {
            return false;
        };
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).get_or_insert(last);
        self.ready.mark_frame_available();
        true
    }
}

/// Decoded media, ready to be paced out frame by frame.
#[derive(Debug, Clone)]
pub struct Clip {
    pub frames: Vec<(Arc<RgbaImage>, Duration)>,
}

impl Clip {
    pub fn decode(bytes: &[u8]) -> Result<Self, MediaError> {
        let frames = match image::guess_format(bytes)? {
            ImageFormat::Gif => {
                let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))?;
                decoder
                    .into_frames()
                    .collect_frames()?
                    .into_iter()
                    .map(|frame| {
                        let (numer, denom) = frame.delay().numer_denom_ms();
                        let ms = if denom == 0 { 0 } else { numer / denom };
                        let delay = if ms == 0 {
                            DEFAULT_FRAME_DELAY
                        } else {
                            Duration::from_millis(ms as u64)
                        };
                        (Arc::new(frame.into_buffer()), delay)
                    })
                    .collect()
            }
            _ => {
                let still = image::load_from_memory(bytes)?.to_rgba8();
                vec![(Arc::new(still), DEFAULT_FRAME_DELAY)]
            }
        };

        if frames.is_empty() {
            return Err(MediaError::Empty);
        }
        Ok(Self { frames })
    }

    pub fn is_still(&self) -> bool {
        self.frames.len() == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Prepared,
    Playing,
}

/// Local producer driving a `VideoSurface` through prepare -> start.
pub struct VideoPlayer {
    surface: Arc<VideoSurface>,
    source: Option<MediaSource>,
    clip: Option<Arc<Clip>>,
    looping: bool,
    state: PlayerState,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl VideoPlayer {
    pub fn new(surface: Arc<VideoSurface>, looping: bool) -> Self {
        Self {
            surface,
            source: None,
            clip: None,
            looping,
            state: PlayerState::Idle,
            stop_tx: None,
            worker: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    /// Swaps the media. The surface keeps its last frame until the new source plays.
    pub fn set_media_source(&mut self, source: MediaSource) {
        self.stop();
        info!("Media source set to {} (offset {}, length {:?})", source.path.display(), source.offset, source.length);
        self.source = Some(source);
        self.clip = None;
        self.state = PlayerState::Idle;
    }

    pub fn prepare(&mut self) -> Result<(), MediaError> {
        let source = self.source.as_ref().ok_or(MediaError::NoSource)?;
        let clip = Clip::decode(&source.read()?)?;
        info!("Prepared {}: {} frame(s)", source.display_name(), clip.frames.len());
        self.clip = Some(Arc::new(clip));
        self.state = PlayerState::Prepared;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), MediaError> {
        if self.state == PlayerState::Playing {
            return Ok(());
        }
        let clip = self.clip.clone().ok_or(MediaError::NotPrepared)?;

        let (stop_tx, stop_rx) = channel::<()>();
        let surface = Arc::clone(&self.surface);
        let looping = self.looping;

        self.worker = Some(thread::spawn(move || {
            loop {
                for (image, delay) in clip.frames.iter() {
                    surface.publish(VideoFrame::new(Arc::clone(image)));
                    if clip.is_still() {
                        return;
                    }
                    match stop_rx.recv_timeout(*delay) {
                        Err(RecvTimeoutError::Timeout) => {}
                        _ => return,
                    }
                }
                if !looping {
                    debug!("Playback finished");
                    return;
                }
            }
        }));
        self.stop_tx = Some(stop_tx);
        self.state = PlayerState::Playing;
        Ok(())
    }

    /// Convenience for the host: prepare then start, logging failures.
    pub fn prepare_and_start(&mut self) -> bool {
        match self.prepare().and_then(|_| self.start()) {
            Ok(()) => true,
            Err(e) => {
                error!("Cannot play media: {}", e);
                false
            }
        }
    }

    pub fn stop(&mut self) {
        // dropping the sender disconnects the worker's channel
        self.stop_tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Video worker panicked");
            }
        }
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Prepared;
        }
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, DynamicImage, Frame, ImageOutputFormat, Rgba};
    use std::io::Write;
    use std::time::Instant;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut cursor, ImageOutputFormat::Png).unwrap();
        cursor.into_inner()
    }

    fn gif_bytes(frames: usize, delay_ms: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            let frames = (0..frames).map(|i| {
                let shade = (i * 40) as u8;
                Frame::from_parts(
                    RgbaImage::from_pixel(4, 2, Rgba([shade, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(delay_ms, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }
        bytes
    }

    fn temp_media(name: &str, prefix: &[u8], payload: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sphere_video_{}_{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(prefix).unwrap();
        file.write_all(payload).unwrap();
        file.write_all(b"trailing junk").unwrap();
        path
    }

    fn wait_for_frame(surface: &VideoSurface) -> Option<VideoFrame> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(frame) = surface.frame_ready().consume_with(|| surface.take_frame()) {
                return frame;
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn flip_matrix_inverts_v_only() {
        let uv = FLIP_V * glam::Vec4::new(0.25, 0.0, 0.0, 1.0);
        assert_eq!((uv.x, uv.y), (0.25, 1.0));
        let uv = FLIP_V * glam::Vec4::new(0.25, 1.0, 0.0, 1.0);
        assert_eq!((uv.x, uv.y), (0.25, 0.0));
    }

    #[test]
    fn reads_only_the_requested_range() {
        let png = png_bytes(8, 4);
        let path = temp_media("range.png", b"HEADER", &png);
        let source = MediaSource { path: path.clone(), offset: 6, length: Some(png.len() as u64) };

        let bytes = source.read().unwrap();
        assert_eq!(bytes, png);
        let clip = Clip::decode(&bytes).unwrap();
        assert!(clip.is_still());
        assert_eq!(clip.frames[0].0.dimensions(), (8, 4));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_or_empty_media_is_reported() {
        let missing = MediaSource::from_path("/nonexistent/clip.gif");
        assert!(matches!(missing.read(), Err(MediaError::Open { .. })));

        let path = temp_media("empty.bin", b"", b"");
        let empty = MediaSource { path: path.clone(), offset: 0, length: Some(0) };
        assert!(matches!(empty.read(), Err(MediaError::Empty)));
        std::fs::remove_file(path).ok();

        assert!(matches!(Clip::decode(b"definitely not media"), Err(MediaError::Decode(_))));
    }

    #[test]
    fn gif_frames_keep_their_delays() {
        let clip = Clip::decode(&gif_bytes(3, 50)).unwrap();
        assert_eq!(clip.frames.len(), 3);
        for (image, delay) in &clip.frames {
            assert_eq!(image.dimensions(), (4, 2));
            assert_eq!(*delay, Duration::from_millis(50));
        }
    }

    #[test]
    fn newer_frame_replaces_unconsumed_one() {
        let surface = VideoSurface::new();
        surface.publish(VideoFrame::new(Arc::new(RgbaImage::new(1, 1))));
        surface.publish(VideoFrame::new(Arc::new(RgbaImage::new(2, 2))));

        let frame = surface.frame_ready().consume_with(|| surface.take_frame()).flatten().unwrap();
        assert_eq!(frame.size(), (2, 2));
        assert!(!surface.frame_ready().consume_if_available());
    }

    #[test]
    fn consumed_still_is_delivered_again_after_texture_rebuild() {
        let surface = VideoSurface::new();
        assert!(!surface.republish_last());

        surface.publish(VideoFrame::new(Arc::new(RgbaImage::new(3, 1))));
        assert!(surface.frame_ready().consume_with(|| surface.take_frame()).flatten().is_some());
        assert!(surface.frame_ready().consume_with(|| surface.take_frame()).is_none());

        // surface recreated
        assert!(surface.republish_last());
        let frame = surface.frame_ready().consume_with(|| surface.take_frame()).flatten().unwrap();
        assert_eq!(frame.size(), (3, 1));
    }

    #[test]
    fn requeue_keeps_a_newer_pending_frame() {
        let surface = VideoSurface::new();
        surface.publish(VideoFrame::new(Arc::new(RgbaImage::new(1, 1))));
        surface.frame_ready().consume_with(|| surface.take_frame());
        surface.publish(VideoFrame::new(Arc::new(RgbaImage::new(4, 4))));

        assert!(surface.republish_last());
        let frame = surface.frame_ready().consume_with(|| surface.take_frame()).flatten().unwrap();
        assert_eq!(frame.size(), (4, 4));
    }

    #[test]
    fn player_requires_source_and_prepare() {
        let mut player = VideoPlayer::new(Arc::new(VideoSurface::new()), false);
        assert!(matches!(player.prepare(), Err(MediaError::NoSource)));
        assert!(matches!(player.start(), Err(MediaError::NotPrepared)));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn player_publishes_into_surface_and_wakes_listener() {
        let surface = Arc::new(VideoSurface::new());
        let (wake_tx, wake_rx) = channel();
        surface.set_frame_listener(move || {
            let _ = wake_tx.send(());
        });

        let path = temp_media("clip.gif", b"", &gif_bytes(2, 20));
        let mut player = VideoPlayer::new(Arc::clone(&surface), true);
        player.set_media_source(MediaSource::from_path(&path));
        player.prepare().unwrap();
        player.start().unwrap();
        assert_eq!(player.state(), PlayerState::Playing);

        assert!(wake_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        let frame = wait_for_frame(&surface).expect("no frame published");
        assert_eq!(frame.size(), (4, 2));
        assert_eq!(frame.transform, FLIP_V);

        // re-attaching stops the worker but keeps the surface usable
        player.set_media_source(MediaSource::from_path(&path));
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.prepare_and_start());
        assert!(wait_for_frame(&surface).is_some());

        player.stop();
        std::fs::remove_file(path).ok();
    }
}
