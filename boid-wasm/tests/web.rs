#![cfg(target_arch = "wasm32")]

use boid_wasm::BoidApp;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
}

#[wasm_bindgen_test]
fn test_app_runs_through_scenes() {
    mount_canvas("boids");
    let mut app = BoidApp::new("boids", 1000.0, 800.0).unwrap();
    assert_eq!(app.scene_name(), "Start");

    assert!(app.frame(0.2).unwrap());
    app.mouse_down(500.0, 315.0).unwrap();
    assert_eq!(app.scene_name(), "Boids");
    assert_eq!(app.boid_count(), 10);

    for _ in 0..30 {
        assert!(app.frame(1.0 / 60.0).unwrap());
    }

    app.key_down("p");
    assert_eq!(app.scene_name(), "Pause");
    assert!(app.frame(1.0 / 60.0).unwrap());

    app.quit_requested();
    assert_eq!(app.scene_name(), "Start");
    app.quit_requested();
    assert!(!app.frame(1.0 / 60.0).unwrap());
}

#[wasm_bindgen_test]
fn test_missing_canvas_is_an_error() {
    assert!(BoidApp::new("no-such-canvas", 100.0, 100.0).is_err());
}
