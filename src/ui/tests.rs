use super::*;
use crate::style::StyleTarget;
use eframe::egui;

fn raw_input(events: Vec<egui::Event>) -> egui::RawInput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;
    raw
}

/// Run one headless frame of the canvas on `ctx` with the provided input events.
fn run_canvas(ctx: &egui::Context, app: &mut PreviewApp, events: Vec<egui::Event>) {
    let _ = ctx.run(raw_input(events), |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        app.handle_keys(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                app.draw_canvas(ui);
            });
    });
}

fn key_press(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }
}

fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

fn logo_style(app: &PreviewApp) -> crate::style::SharedStyle {
    app.page.elements[0].style.clone()
}

#[test]
fn dragging_the_target_moves_it() {
    let mut app = PreviewApp::default();
    app.enable_selector("#hero-logo").expect("logo exists");

    let ctx = egui::Context::default();

    // First frame: learn where the canvas sits on screen
    run_canvas(&ctx, &mut app, vec![]);
    let grab = app.page_to_screen(egui::pos2(100.0, 60.0));
    let release = grab + egui::vec2(30.0, 20.0);

    run_canvas(&ctx, &mut app, vec![egui::Event::PointerMoved(grab)]);
    run_canvas(&ctx, &mut app, vec![button(grab, true)]);
    assert!(app.tool.is_dragging(), "press on the target should start a drag");

    run_canvas(&ctx, &mut app, vec![egui::Event::PointerMoved(release)]);
    run_canvas(&ctx, &mut app, vec![button(release, false)]);

    assert!(!app.tool.is_dragging());
    let report = app.tool.position().expect("still active");
    assert_eq!((report.x, report.y, report.scale), (30, 20, 100));
    assert_eq!(logo_style(&app).property("left"), "30px");
    assert_eq!(logo_style(&app).property("top"), "20px");
}

#[test]
fn pressing_off_target_does_not_drag() {
    let mut app = PreviewApp::default();
    app.enable_selector("#hero-logo").expect("logo exists");

    let ctx = egui::Context::default();
    run_canvas(&ctx, &mut app, vec![]);
    let elsewhere = app.page_to_screen(egui::pos2(700.0, 600.0));

    run_canvas(&ctx, &mut app, vec![egui::Event::PointerMoved(elsewhere)]);
    run_canvas(&ctx, &mut app, vec![button(elsewhere, true)]);
    assert!(!app.tool.is_dragging());
    run_canvas(&ctx, &mut app, vec![button(elsewhere, false)]);
    assert_eq!(app.tool.position().map(|r| (r.x, r.y)), Some((0, 0)));
}

#[test]
fn plus_key_scales_up() {
    let mut app = PreviewApp::default();
    app.enable_selector("#hero-logo").expect("logo exists");

    let ctx = egui::Context::default();
    run_canvas(
        &ctx,
        &mut app,
        vec![
            key_press(egui::Key::Plus),
            key_press(egui::Key::Plus),
            key_press(egui::Key::Plus),
        ],
    );

    assert_eq!(app.tool.position().map(|r| r.scale), Some(103));
    assert!(logo_style(&app).property("transform").starts_with("scale(1.03"));
}

#[test]
fn arrow_keys_nudge() {
    let mut app = PreviewApp::default();
    app.enable_selector("#tagline").expect("tagline exists");

    let ctx = egui::Context::default();
    let shift_right = egui::Event::Key {
        key: egui::Key::ArrowRight,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::SHIFT,
    };
    run_canvas(
        &ctx,
        &mut app,
        vec![shift_right, key_press(egui::Key::ArrowUp)],
    );

    assert_eq!(app.tool.position().map(|r| (r.x, r.y)), Some((10, -1)));
}

#[test]
fn escape_restores_the_page() {
    let mut app = PreviewApp::default();
    app.enable_selector("#hero-logo").expect("logo exists");
    let logo = logo_style(&app);
    assert!(!logo.declarations().is_empty());

    let ctx = egui::Context::default();
    run_canvas(&ctx, &mut app, vec![key_press(egui::Key::ArrowDown)]);
    run_canvas(&ctx, &mut app, vec![key_press(egui::Key::Escape)]);

    assert!(!app.tool.is_active());
    assert!(logo.declarations().is_empty());
    assert!(app
        .status
        .as_deref()
        .is_some_and(|s| s.contains("Y: 1")));
    assert_eq!(app.page.elements[0].rendered_rect(), app.page.elements[0].natural);
}

#[test]
fn keys_do_nothing_without_a_session() {
    let mut app = PreviewApp::default();
    let ctx = egui::Context::default();
    run_canvas(&ctx, &mut app, vec![key_press(egui::Key::ArrowDown)]);

    assert!(!app.tool.is_active());
    assert!(logo_style(&app).declarations().is_empty());
}

#[test]
fn unknown_selector_reports_on_status_line() {
    let mut app = PreviewApp::default();
    assert!(app.enable_selector("#nope").is_err());
    assert!(!app.tool.is_active());
    assert!(app.status.as_deref().is_some_and(|s| s.contains("#nope")));
}

#[test]
fn full_frame_draws_toolbar_and_panel() {
    let mut app = PreviewApp::default();
    app.enable_selector("#badge").expect("badge exists");

    let ctx = egui::Context::default();
    let _ = ctx.run(raw_input(vec![]), |ctx| app.draw_frame(ctx));

    assert!(app.hud.last_rect.is_some(), "panel should be drawn while active");
    // The badge keeps its existing absolute offset and scale
    let report = app.tool.position().expect("active");
    assert_eq!((report.x, report.y, report.scale), (12, 8, 120));
}

#[test]
fn settings_roundtrip_through_json() {
    let mut app = PreviewApp::default();
    app.dark_mode = false;
    app.selector_input = ".tagline".to_string();
    app.config.nudge_step_large = 25.0;

    let json = app.to_json().expect("serialize");
    let restored = PreviewApp::from_json(&json).expect("deserialize");

    assert!(!restored.dark_mode);
    assert_eq!(restored.selector_input, ".tagline");
    assert_eq!(restored.config.nudge_step_large, 25.0);
    assert!(!restored.tool.is_active());
}

#[test]
fn invalid_stored_options_fall_back_to_defaults() {
    let json = r#"{ "dark_mode": false, "config": { "min_scale": 5.0, "max_scale": 1.0 } }"#;
    let restored = PreviewApp::from_json(json).expect("deserialize");
    assert!(!restored.dark_mode);
    assert_eq!(restored.config, crate::config::PositioningConfig::default());
}

#[test]
fn pressing_the_panel_body_over_the_target_does_not_drag() {
    let mut app = PreviewApp::default();
    app.enable_selector("#hero-video").expect("video exists");

    let ctx = egui::Context::default();
    run_canvas(&ctx, &mut app, vec![]);

    // Park the panel over the middle of the video box
    app.hud.origin = Some(egui::pos2(200.0, 250.0));
    run_canvas(&ctx, &mut app, vec![]);
    let panel = app.hud.last_rect.expect("panel drawn");
    let header = app.hud.last_header_rect.expect("header drawn");
    let body = egui::pos2(panel.center().x, header.bottom() + 20.0);
    assert!(app.target_screen_rect().is_some_and(|r| r.contains(body)));

    run_canvas(&ctx, &mut app, vec![egui::Event::PointerMoved(body)]);
    run_canvas(&ctx, &mut app, vec![button(body, true)]);
    assert!(!app.tool.is_dragging());
    run_canvas(&ctx, &mut app, vec![button(body, false)]);
    assert_eq!(app.tool.position().map(|r| (r.x, r.y)), Some((0, 0)));
}
