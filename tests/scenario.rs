use sphere_video::camera::{FrustumBounds, Orientation, Viewport};
use sphere_video::input::{PointerEvent, PointerKind, TouchController};
use sphere_video::mesh::{build_sphere, sphere_vertex_count};
use sphere_video::video::{VideoFrame, VideoSurface};
use sphere_video::ViewerConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn default_sphere_and_overlay_layout() {
    let config = ViewerConfig::default();

    let mesh = build_sphere(config.sphere_radius, config.tetta_steps, config.phi_steps);
    assert_eq!(mesh.vertex_count(), 380);
    assert_eq!(sphere_vertex_count(10, 18), 380);

    let viewport = Viewport::new(1000, 2000, config.split_fraction());
    assert_eq!(viewport.bounds, FrustumBounds { left: -1.0, right: 1.0, bottom: -2.0, top: 2.0 });

    // full width, bottom fifth of the vertical range
    let [a, b, c, d] = viewport.rectangle;
    assert_eq!((a[0], a[1]), (-1.0, -2.0));
    assert_eq!(b[0], -1.0);
    assert!((b[1] - -1.2).abs() < 1e-6);
    assert_eq!((c[0], c[1]), (1.0, -2.0));
    assert_eq!(d[0], 1.0);
    assert!((d[1] - -1.2).abs() < 1e-6);
}

#[test]
fn overlay_tap_at_strip_top_looks_at_horizon_top() {
    let config = ViewerConfig::default();
    let mut touch = TouchController::new(config.touch_sensitivity, config.split_fraction());
    let mut orientation = Orientation::default();

    let changed = touch.handle(PointerEvent::new(PointerKind::Down, 0.0, 1600.0), (1000, 2000), &mut orientation);
    assert!(changed);
    assert_eq!(orientation.angle_x, -90.0);
    assert!((orientation.angle_y - 90.0).abs() < 1e-4);

    let viewport = Viewport::new(1000, 2000, config.split_fraction());
    let transform = viewport.sphere_transform(&orientation);
    assert!(transform.is_finite());
    // overlay ignores orientation
    assert_eq!(viewport.overlay_transform(), Viewport::new(1000, 2000, 0.2).overlay_transform());
}

#[test]
fn published_frame_wakes_listener_and_is_consumed_once() {
    let surface = VideoSurface::new();
    let wakeups = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakeups);
    surface.set_frame_listener(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let image = Arc::new(image::RgbaImage::new(4, 2));
    surface.publish(VideoFrame::new(Arc::clone(&image)));
    assert_eq!(wakeups.load(Ordering::SeqCst), 1);

    let refreshed = surface.frame_ready().consume_with(|| surface.take_frame());
    let frame = refreshed.flatten().expect("frame should be pending");
    assert_eq!(frame.size(), (4, 2));
    assert!(surface.frame_ready().consume_with(|| ()).is_none());
}
