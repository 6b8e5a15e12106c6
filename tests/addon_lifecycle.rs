//! Enable/disable round trips across the whole registry set.

mod common;

use http::StatusCode;

use common::{TestApp, json};
use quill_addon::events::names;

#[tokio::test]
async fn disabling_an_addon_removes_every_registration() {
    let app = TestApp::new().await;
    let mut registries = app.load().await;
    let admin = app.principal("admin").await;

    // Baseline: the contact addon serves its page and listens to the
    // footer event.
    let out = app.get(&registries, &admin, "/admin/contact-messages").await;
    assert_eq!(out.status, StatusCode::OK);
    assert!(registries.events.has_listeners(names::ADMIN_FOOTER));

    app.host
        .disable(&app.store, &mut registries, "contact")
        .await
        .unwrap();

    let out = app.get(&registries, &admin, "/admin/contact-messages").await;
    assert_eq!(out.status, StatusCode::NOT_FOUND);
    assert!(!registries.events.has_listeners(names::ADMIN_FOOTER));
    let menu = registries
        .menus
        .visible_tree(&admin, &app.capabilities, "/admin");
    assert!(menu.iter().all(|n| n.id != "contact-messages"));

    // The durable flag carries to the next request's load.
    let fresh = app.load().await;
    let out = app.get(&fresh, &admin, "/admin/contact-messages").await;
    assert_eq!(out.status, StatusCode::NOT_FOUND);
    assert!(!fresh.manifest("contact").unwrap().enabled);
}

#[tokio::test]
async fn re_enabling_rebuilds_the_same_registrations() {
    let app = TestApp::new().await;
    let mut registries = app.load().await;
    let admin = app.principal("admin").await;

    let routes_before = registries.routes.len();
    let menus_before = registries.menus.len();

    app.host
        .disable(&app.store, &mut registries, "seo")
        .await
        .unwrap();
    app.host
        .enable(&app.store, &mut registries, "seo")
        .await
        .unwrap();

    assert_eq!(registries.routes.len(), routes_before);
    assert_eq!(registries.menus.len(), menus_before);

    let out = app.get(&registries, &admin, "/admin/seo").await;
    assert_eq!(out.status, StatusCode::OK);

    // A fresh load agrees with the mutated-in-place registries.
    let fresh = app.load().await;
    assert_eq!(fresh.routes.len(), routes_before);
    assert_eq!(fresh.menus.len(), menus_before);
}

#[tokio::test]
async fn toggle_api_flips_the_flag_for_the_next_load() {
    let app = TestApp::new().await;
    let registries = app.load().await;
    let admin = app.principal("admin").await;

    let out = app
        .post_json(
            &registries,
            &admin,
            "/admin/api/addons/seo/toggle",
            serde_json::json!({}),
        )
        .await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(json(&out)["data"]["enabled"], false);

    // The current request still dispatches with the old registries; the
    // next load reflects the flag.
    let fresh = app.load().await;
    let out = app.get(&fresh, &admin, "/admin/seo").await;
    assert_eq!(out.status, StatusCode::NOT_FOUND);

    // Toggling again brings it back.
    let out = app
        .post_json(
            &registries,
            &admin,
            "/admin/api/addons/seo/toggle",
            serde_json::json!({}),
        )
        .await;
    assert_eq!(json(&out)["data"]["enabled"], true);
    let fresh = app.load().await;
    let out = app.get(&fresh, &admin, "/admin/seo").await;
    assert_eq!(out.status, StatusCode::OK);
}

#[tokio::test]
async fn the_system_addon_cannot_be_toggled() {
    let app = TestApp::new().await;
    let registries = app.load().await;
    let admin = app.principal("admin").await;

    let out = app
        .post_json(
            &registries,
            &admin,
            "/admin/api/addons/system/toggle",
            serde_json::json!({}),
        )
        .await;
    assert_eq!(out.status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&out)["success"], false);
}

#[tokio::test]
async fn toggling_requires_the_manage_addons_capability() {
    let app = TestApp::new().await;
    let registries = app.load().await;
    let editor = app.principal("vera").await;

    let out = app
        .post_json(
            &registries,
            &editor,
            "/admin/api/addons/seo/toggle",
            serde_json::json!({}),
        )
        .await;
    assert_eq!(out.status, StatusCode::FORBIDDEN);
    assert_eq!(json(&out)["success"], false);
}
