use spindle::render::{FixedSurface, RecordingRenderer};
use spindle::{EventKind, Phase, PointerEvent, PointerPhase, Wheel, WheelConfig, WheelEvent};
use std::cell::RefCell;
use std::rc::Rc;

type TestWheel = Wheel<FixedSurface, RecordingRenderer>;

/// Five items, 36° apart: bounds [0, 144], elastic [-10, 154].
fn five_item_wheel() -> (TestWheel, Rc<RefCell<Vec<usize>>>) {
    let mut wheel = Wheel::new(
        FixedSurface::uniform(200.0, 5, 78.0),
        RecordingRenderer::default(),
        WheelConfig::default(),
    )
    .unwrap();
    assert_eq!(wheel.layout().item_step, 36.0);
    assert_eq!(wheel.angle(), 0.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    wheel.on(
        EventKind::Change,
        Rc::new(move |event: &WheelEvent| {
            let WheelEvent::Change { index } = event;
            sink.borrow_mut().push(*index);
        }),
    );
    (wheel, seen)
}

fn pointer(wheel: &mut TestWheel, phase: PointerPhase, y: f64, t: f64) {
    wheel.handle_pointer(PointerEvent::touch(phase, y, t));
}

/// Ticks until the wheel stops asking for frames. Returns the number of frames drawn.
fn run_frames(wheel: &mut TestWheel) -> usize {
    let mut frames = 0;
    while wheel.tick() {
        frames += 1;
        assert!(frames < 10_000, "animation never finished");
    }
    frames + 1
}

#[test]
fn flick_glides_onto_nearest_item() {
    let (mut wheel, seen) = five_item_wheel();

    // 96px upwards in 100ms: -0.96 px/ms, a raw glide of ~100.35°
    pointer(&mut wheel, PointerPhase::Down, 300.0, 0.0);
    pointer(&mut wheel, PointerPhase::Up, 204.0, 100.0);

    assert_eq!(wheel.phase(), Phase::Settling);
    let animation = wheel.animation().unwrap();
    assert_eq!(animation.delta(), 108.0);
    assert!(seen.borrow().is_empty());

    let frames = run_frames(&mut wheel);

    assert_eq!(frames, 57);
    assert_eq!(wheel.phase(), Phase::Idle);
    assert_eq!(wheel.angle(), 108.0);
    assert_eq!(wheel.index(), 3);
    assert_eq!(*seen.borrow(), vec![3]);

    let renderer = wheel.renderer();
    let written: Vec<f64> = renderer.list_transforms.iter().map(|t| t.angle).collect();
    assert!(written.iter().all(|a| (0.0..=108.0).contains(a)));
    assert!(written.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn hard_flick_is_clamped_at_elastic_bound() {
    let (mut wheel, seen) = five_item_wheel();

    // -3 px/ms would glide 1320°; the elastic bound cuts it to 154°
    pointer(&mut wheel, PointerPhase::Down, 300.0, 0.0);
    pointer(&mut wheel, PointerPhase::Up, 0.0, 100.0);

    let animation = wheel.animation().unwrap();
    assert_eq!(animation.delta(), 144.0);
    let expected_steps = 3000.0 * (154.0 / 1320.0) * 0.6 / (1000.0 / 60.0);
    assert!((animation.total_steps() - expected_steps).abs() < 1e-6);

    run_frames(&mut wheel);

    assert_eq!(wheel.angle(), 144.0);
    assert_eq!(wheel.index(), 4);
    assert_eq!(*seen.borrow(), vec![4]);
    assert!(
        wheel
            .renderer()
            .list_transforms
            .iter()
            .all(|t| (-10.0..=154.0).contains(&t.angle))
    );
}

#[test]
fn new_drag_cancels_running_inertia() {
    let (mut wheel, seen) = five_item_wheel();
    pointer(&mut wheel, PointerPhase::Down, 300.0, 0.0);
    pointer(&mut wheel, PointerPhase::Up, 204.0, 100.0);

    for _ in 0..5 {
        assert!(wheel.tick());
    }
    assert_eq!(wheel.animation().unwrap().current_step(), 5);
    let paused_at = wheel.angle();
    let writes = wheel.renderer().list_transforms.len();

    pointer(&mut wheel, PointerPhase::Down, 300.0, 200.0);

    assert_eq!(wheel.phase(), Phase::Dragging);
    assert!(wheel.animation().is_none());
    assert!(!wheel.tick());
    assert_eq!(wheel.renderer().list_transforms.len(), writes);
    assert_eq!(wheel.angle(), paused_at);

    // only the new drag writes from here on
    pointer(&mut wheel, PointerPhase::Move, 300.0, 216.0);
    assert_eq!(wheel.renderer().list_transforms.len(), writes + 1);
    assert_eq!(wheel.angle(), paused_at);
    assert!(seen.borrow().is_empty());
}

#[test]
fn release_velocity_window_follows_pauses() {
    // continuous motion: baseline stays at the t=0 touch, v = -60px / 150ms
    let (mut wheel, _) = five_item_wheel();
    pointer(&mut wheel, PointerPhase::Down, 300.0, 0.0);
    pointer(&mut wheel, PointerPhase::Move, 250.0, 100.0);
    pointer(&mut wheel, PointerPhase::Up, 240.0, 150.0);
    let steps = wheel.animation().unwrap().total_steps();
    assert!((steps - 0.4 * 1000.0 / (1000.0 / 60.0)).abs() < 1e-6, "{steps}");

    // a sample more than 300ms after the baseline resets it: v = -10px / 20ms
    let (mut wheel, _) = five_item_wheel();
    pointer(&mut wheel, PointerPhase::Down, 300.0, 0.0);
    pointer(&mut wheel, PointerPhase::Move, 250.0, 100.0);
    pointer(&mut wheel, PointerPhase::Move, 200.0, 500.0);
    pointer(&mut wheel, PointerPhase::Up, 190.0, 520.0);
    let steps = wheel.animation().unwrap().total_steps();
    assert!((steps - 0.5 * 1000.0 / (1000.0 / 60.0)).abs() < 1e-6, "{steps}");
}

#[test]
fn every_settle_lands_on_an_item() {
    let scripts: &[&[(PointerPhase, f64, f64)]] = &[
        &[
            (PointerPhase::Down, 300.0, 0.0),
            (PointerPhase::Move, 280.0, 16.0),
            (PointerPhase::Up, 270.0, 32.0),
        ],
        &[
            (PointerPhase::Down, 100.0, 0.0),
            (PointerPhase::Move, 400.0, 50.0),
            (PointerPhase::Up, 700.0, 80.0),
        ],
        &[
            (PointerPhase::Down, 300.0, 0.0),
            (PointerPhase::Move, 100.0, 40.0),
            (PointerPhase::Move, 90.0, 500.0),
            (PointerPhase::Cancel, 90.0, 900.0),
        ],
        &[
            (PointerPhase::Down, 500.0, 0.0),
            (PointerPhase::Move, 10.0, 30.0),
            (PointerPhase::Up, -400.0, 60.0),
        ],
    ];

    for script in scripts {
        let (mut wheel, seen) = five_item_wheel();
        for &(phase, y, t) in *script {
            pointer(&mut wheel, phase, y, t);
            if wheel.phase() == Phase::Dragging {
                assert!((-10.0..=154.0).contains(&wheel.angle()));
            }
        }
        run_frames(&mut wheel);

        let angle = wheel.angle();
        assert!((0.0..=144.0).contains(&angle), "settled outside bounds: {angle}");
        assert_eq!(angle % 36.0, 0.0, "settled between items: {angle}");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], wheel.index());
    }
}

#[test]
fn visibility_tracks_the_drawn_angle() {
    let (mut wheel, _) = five_item_wheel();
    wheel.set_index(2);

    let classes = &wheel.renderer().item_classes;
    assert_eq!(classes[2], spindle::Visibility::Highlighted);
    assert_eq!(classes[0], spindle::Visibility::Visible);
    assert_eq!(
        classes,
        &wheel.items().iter().map(|i| i.visibility).collect::<Vec<_>>()
    );
}
