use tschart::api::{
    ChartEngine, ChartInput, ChartType, ChartVisualConfig, OverlayManager, OverlayState,
    SharedOverlay, TooltipConfig,
};
use tschart::core::{MetadataMap, MetricMetadata, Point, Series, Size, Viewport};
use tschart::render::{NullSurface, Placement};

fn input(metric: &str) -> ChartInput {
    let mut metadata = MetadataMap::new();
    metadata.insert(metric.to_owned(), MetricMetadata::new(metric));
    ChartInput::new(
        vec![0.0, 60.0, 120.0],
        vec![Series::new(metric, vec![Some(1.0), Some(2.0), Some(3.0)])],
        metadata,
    )
}

fn shared() -> SharedOverlay<NullSurface> {
    OverlayManager::new(NullSurface::default()).into_shared()
}

fn engine(overlay: &SharedOverlay<NullSurface>, metric: &str) -> ChartEngine<NullSurface> {
    ChartEngine::new(
        overlay.clone(),
        Viewport::new(600, 300),
        input(metric),
        ChartVisualConfig::new(ChartType::Line).with_time_zone("UTC"),
    )
    .expect("engine")
}

fn hover(engine: &mut ChartEngine<NullSurface>) {
    engine.pointer_enter();
    let placed = engine.pointer_move(10.0, 150.0);
    assert!(placed.is_some(), "hover should show the tooltip");
}

fn shown_metric(overlay: &SharedOverlay<NullSurface>) -> Option<String> {
    overlay
        .borrow()
        .surface()
        .content
        .as_ref()
        .map(|content| content.entries[0].metric.name.clone())
}

#[test]
fn engines_share_one_attached_surface() {
    let overlay = shared();
    let _cpu = engine(&overlay, "cpu");
    let _mem = engine(&overlay, "mem");
    let manager = overlay.borrow();
    assert_eq!(manager.surface().attach_count, 1);
    assert_eq!(manager.state(), OverlayState::Idle);
}

#[test]
fn last_chart_to_render_owns_the_overlay() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mut mem = engine(&overlay, "mem");

    hover(&mut cpu);
    assert_eq!(overlay.borrow().owner(), Some(cpu.id()));
    assert_eq!(shown_metric(&overlay).as_deref(), Some("cpu"));

    hover(&mut mem);
    assert_eq!(overlay.borrow().owner(), Some(mem.id()));
    assert_eq!(shown_metric(&overlay).as_deref(), Some("mem"));
    assert!(overlay.borrow().surface().visible);
}

#[test]
fn leaving_a_chart_that_lost_ownership_keeps_the_overlay() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mut mem = engine(&overlay, "mem");
    hover(&mut cpu);
    hover(&mut mem);

    cpu.pointer_leave();
    let manager = overlay.borrow();
    assert!(manager.surface().visible);
    assert_eq!(manager.owner(), Some(mem.id()));
    assert_eq!(manager.state(), OverlayState::Visible);
}

#[test]
fn stale_hide_is_ignored() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mut mem = engine(&overlay, "mem");
    hover(&mut cpu);
    hover(&mut mem);

    assert!(!overlay.borrow_mut().hide(cpu.id()));
    assert!(overlay.borrow().surface().visible);
    assert!(overlay.borrow_mut().hide(mem.id()));
    let manager = overlay.borrow();
    assert!(!manager.surface().visible);
    assert!(manager.surface().content.is_none());
    assert_eq!(manager.state(), OverlayState::Idle);
}

#[test]
fn owner_leaving_hides_the_overlay() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    hover(&mut cpu);
    cpu.pointer_leave();
    let manager = overlay.borrow();
    assert_eq!(manager.owner(), None);
    assert!(!manager.surface().visible);
    assert!(!cpu.cursor_state().hovering);
}

#[test]
fn placement_ticket_goes_stale_when_ownership_moves() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mut mem = engine(&overlay, "mem");
    hover(&mut cpu);

    let ticket = overlay
        .borrow()
        .request_position(cpu.id(), Point::new(300.0, 300.0))
        .expect("owner may request a position");
    hover(&mut mem);

    let committed = overlay
        .borrow_mut()
        .commit_position(ticket, Size::new(100.0, 50.0));
    assert!(committed.is_none());
}

#[test]
fn placement_ticket_goes_stale_after_re_render() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    hover(&mut cpu);

    let ticket = overlay
        .borrow()
        .request_position(cpu.id(), Point::new(300.0, 300.0))
        .expect("ticket");
    cpu.pointer_move(200.0, 150.0);
    assert!(
        overlay
            .borrow_mut()
            .commit_position(ticket, Size::new(100.0, 50.0))
            .is_none()
    );

    let fresh = overlay
        .borrow()
        .request_position(cpu.id(), Point::new(300.0, 300.0))
        .expect("fresh ticket");
    let placed = overlay
        .borrow_mut()
        .commit_position(fresh, Size::new(100.0, 50.0))
        .expect("fresh placement");
    assert_eq!(placed.placement, Placement::TopStart);
    assert_eq!(placed.position, Point::new(308.0, 246.0));
    assert_eq!(overlay.borrow().surface().position, Some(placed.position));
}

#[test]
fn non_owner_cannot_request_a_position() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mem = engine(&overlay, "mem");
    hover(&mut cpu);
    assert!(
        overlay
            .borrow()
            .request_position(mem.id(), Point::new(0.0, 0.0))
            .is_none()
    );
}

#[test]
fn anchor_includes_the_chart_bounds_origin() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    cpu.set_bounds_origin(Point::new(100.0, 400.0));
    cpu.pointer_enter();
    let placed = cpu.pointer_move(0.0, 150.0).expect("placed");
    // snapped x = 0, anchor (100, 550), tooltip 160x90 above and to the right
    assert_eq!(placed.position, Point::new(108.0, 456.0));
}

#[test]
fn destroying_the_owner_releases_the_overlay() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    let mut mem = engine(&overlay, "mem");
    hover(&mut cpu);
    hover(&mut mem);

    mem.destroy();
    assert!(mem.is_destroyed());
    assert_eq!(overlay.borrow().owner(), None);
    assert!(!overlay.borrow().surface().visible);
    assert!(mem.pointer_move(10.0, 10.0).is_none());

    // the survivor can take the overlay back
    hover(&mut cpu);
    assert_eq!(overlay.borrow().owner(), Some(cpu.id()));
}

#[test]
fn dropping_the_owner_releases_the_overlay() {
    let overlay = shared();
    {
        let mut cpu = engine(&overlay, "cpu");
        hover(&mut cpu);
        assert!(overlay.borrow().owner().is_some());
    }
    assert_eq!(overlay.borrow().owner(), None);
}

#[test]
fn hidden_tooltip_never_touches_the_overlay() {
    let overlay = shared();
    let mut quiet = ChartEngine::new(
        overlay.clone(),
        Viewport::new(600, 300),
        input("cpu"),
        ChartVisualConfig::new(ChartType::Line).with_tooltip(TooltipConfig {
            hide: true,
            visibility_limit: None,
        }),
    )
    .expect("engine");
    quiet.pointer_enter();
    assert!(quiet.pointer_move(10.0, 150.0).is_none());
    assert_eq!(quiet.cursor_state().snapped_index, Some(0));
    let manager = overlay.borrow();
    assert_eq!(manager.state(), OverlayState::Uninitialized);
    assert_eq!(manager.surface().render_count, 0);
}

#[test]
fn disposed_overlay_ignores_hover() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    overlay.borrow_mut().dispose();
    cpu.pointer_enter();
    assert!(cpu.pointer_move(10.0, 150.0).is_none());
    assert_eq!(overlay.borrow().state(), OverlayState::Destroyed);
}

#[test]
fn charts_keep_working_after_the_overlay_is_disposed() {
    let overlay = shared();
    overlay.borrow_mut().dispose();

    let mut cpu = engine(&overlay, "cpu");
    assert!(cpu.plan().is_some());
    assert!(cpu.y_axis().is_some());

    cpu.update(
        input("mem"),
        ChartVisualConfig::new(ChartType::Area).with_time_zone("UTC"),
    )
    .expect("update against a disposed overlay");
    assert!(cpu.plan().expect("plan").is_stacked());
    assert_eq!(cpu.plan().expect("plan").series_columns().len(), 1);

    cpu.pointer_enter();
    assert!(cpu.pointer_move(10.0, 150.0).is_none());
    assert!(cpu.tooltip_at(0).is_some());
    let manager = overlay.borrow();
    assert_eq!(manager.state(), OverlayState::Destroyed);
    assert_eq!(manager.surface().attach_count, 0);
}

#[test]
fn busy_overlay_drops_the_event_instead_of_panicking() {
    let overlay = shared();
    let mut cpu = engine(&overlay, "cpu");
    cpu.pointer_enter();
    let guard = overlay.borrow_mut();
    assert!(cpu.pointer_move(10.0, 150.0).is_none());
    drop(guard);
    assert!(cpu.pointer_move(10.0, 150.0).is_some());
}
