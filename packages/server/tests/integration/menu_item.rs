use crate::common::{MAX_UPLOAD, PLACEHOLDER, TestApp, menu_item_form, routes, with_image};

const PHOTO: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";

/// Create a menu item through the API and return its id.
async fn create_item(app: &TestApp, form: reqwest::multipart::Form) -> i32 {
    let res = app.post_multipart(routes::MENU_ITEM_CREATE, form).await;
    res.assert_redirect(routes::MENU_ITEMS);

    let list = app.get(routes::MENU_ITEMS).await;
    list.body
        .as_array()
        .and_then(|rows| rows.last())
        .and_then(|row| row["id"].as_i64())
        .expect("created item should be listed") as i32
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn create_form_lists_categories_without_sub_categories() {
        let app = TestApp::spawn().await;
        app.seed_pizza().await;

        let res = app.get(routes::MENU_ITEM_CREATE).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["categories"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["sub_categories"], serde_json::json!([]));
        assert_eq!(res.body["menu_item"]["name"], "");
    }

    #[tokio::test]
    async fn create_without_upload_copies_placeholder() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let id = create_item(
            &app,
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
        )
        .await;

        let item = app.find_menu_item(id).await.unwrap();
        let expected = format!("/images/{id}.png");
        assert_eq!(item.image.as_deref(), Some(expected.as_str()));
        assert_eq!(std::fs::read(app.image_file(&expected)).unwrap(), PLACEHOLDER);
        assert_eq!(item.name, "Margherita");
        assert_eq!(item.price, 9.99);
        assert_eq!(item.description.as_deref(), Some("House special"));
    }

    #[tokio::test]
    async fn create_with_upload_stores_bytes_under_the_new_id() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let form = with_image(
            menu_item_form("Diavola", "11.50", category_id, sub_category_id),
            "photo.jpg",
            PHOTO,
        );
        let id = create_item(&app, form).await;

        let item = app.find_menu_item(id).await.unwrap();
        let expected = format!("/images/{id}.jpg");
        assert_eq!(item.image.as_deref(), Some(expected.as_str()));
        assert_eq!(std::fs::read(app.image_file(&expected)).unwrap(), PHOTO);
    }

    #[tokio::test]
    async fn list_attaches_both_relations() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        create_item(
            &app,
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
        )
        .await;

        let list = app.get(routes::MENU_ITEMS).await;
        let rows = list.body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["category"]["name"], "Pizza");
        assert_eq!(rows[0]["sub_category"]["name"], "Classic");
        assert_eq!(rows[0]["spicyness"], "Spicy");
    }

    #[tokio::test]
    async fn negative_price_is_redisplayed_without_storing() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let res = app
            .post_multipart(
                routes::MENU_ITEM_CREATE,
                menu_item_form("Margherita", "-1", category_id, sub_category_id),
            )
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["menu_item"]["name"], "Margherita");
        assert_eq!(res.body["menu_item"]["price"], -1.0);
        assert!(res.body["errors"]["price"].is_array());
        assert_eq!(
            res.body["sub_categories"][0]["id"], sub_category_id,
            "sub categories of the selected category are reloaded"
        );
        assert_eq!(app.menu_item_count().await, 0);
    }

    #[tokio::test]
    async fn sub_category_of_another_category_is_rejected() {
        let app = TestApp::spawn().await;
        let (category_id, _) = app.seed_pizza().await;
        let other = app.insert_category("Drinks").await;
        let foreign_sub = app.insert_sub_category("Soda", other).await;

        let res = app
            .post_multipart(
                routes::MENU_ITEM_CREATE,
                menu_item_form("Margherita", "9.99", category_id, foreign_sub),
            )
            .await;

        assert_eq!(res.status, 422);
        assert!(res.body["errors"]["sub_category_id"].is_array());
        assert_eq!(app.menu_item_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let (_, sub_category_id) = app.seed_pizza().await;

        let res = app
            .post_multipart(
                routes::MENU_ITEM_CREATE,
                menu_item_form("Margherita", "9.99", 999, sub_category_id),
            )
            .await;

        assert_eq!(res.status, 422);
        assert!(res.body["errors"]["category_id"].is_array());
        assert_eq!(app.menu_item_count().await, 0);
    }

    #[tokio::test]
    async fn non_image_upload_is_a_field_error() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let form = with_image(
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
            "menu.exe",
            b"MZ",
        );
        let res = app.post_multipart(routes::MENU_ITEM_CREATE, form).await;

        assert_eq!(res.status, 422);
        assert!(res.body["errors"]["image"].is_array());
        assert_eq!(app.menu_item_count().await, 0);
    }

    #[tokio::test]
    async fn oversized_upload_is_refused() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let big = vec![0u8; MAX_UPLOAD as usize + 1];
        let form = with_image(
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
            "photo.png",
            &big,
        );
        let res = app.post_multipart(routes::MENU_ITEM_CREATE, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.menu_item_count().await, 0);
    }
}

mod editing {
    use super::*;

    #[tokio::test]
    async fn edit_form_filters_sub_categories_by_the_row_category() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let other = app.insert_category("Drinks").await;
        app.insert_sub_category("Soda", other).await;
        let id = app
            .insert_menu_item("Margherita", category_id, sub_category_id, None)
            .await;

        let res = app.get(&routes::menu_item("edit", id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["menu_item"]["id"], id);
        assert_eq!(res.body["menu_item"]["category"]["name"], "Pizza");
        assert_eq!(res.body["categories"].as_array().unwrap().len(), 2);
        let subs = res.body["sub_categories"].as_array().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0]["name"], "Classic");
    }

    #[tokio::test]
    async fn edit_without_upload_keeps_image_reference_and_file() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let id = create_item(
            &app,
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
        )
        .await;
        let before = app.find_menu_item(id).await.unwrap().image.unwrap();

        let res = app
            .post_multipart(
                &routes::menu_item("edit", id),
                menu_item_form("Marinara", "7.25", category_id, sub_category_id),
            )
            .await;
        res.assert_redirect(routes::MENU_ITEMS);

        let details = app.get(&routes::menu_item("details", id)).await;
        assert_eq!(details.body["menu_item"]["name"], "Marinara");
        assert_eq!(details.body["menu_item"]["price"], 7.25);
        assert_eq!(details.body["menu_item"]["image"], before.as_str());
        assert_eq!(std::fs::read(app.image_file(&before)).unwrap(), PLACEHOLDER);
    }

    #[tokio::test]
    async fn edit_with_upload_replaces_the_old_file() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let id = create_item(
            &app,
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
        )
        .await;
        let old = format!("/images/{id}.png");
        assert!(app.image_file(&old).exists());

        let form = with_image(
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
            "photo.jpg",
            PHOTO,
        );
        let res = app.post_multipart(&routes::menu_item("edit", id), form).await;
        res.assert_redirect(routes::MENU_ITEMS);

        let new = format!("/images/{id}.jpg");
        let item = app.find_menu_item(id).await.unwrap();
        assert_eq!(item.image.as_deref(), Some(new.as_str()));
        assert!(!app.image_file(&old).exists());
        assert_eq!(std::fs::read(app.image_file(&new)).unwrap(), PHOTO);
    }

    #[tokio::test]
    async fn invalid_edit_leaves_the_row_untouched() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let id = app
            .insert_menu_item("Margherita", category_id, sub_category_id, Some("/images/1.png"))
            .await;

        let res = app
            .post_multipart(
                &routes::menu_item("edit", id),
                menu_item_form("", "9.99", category_id, sub_category_id),
            )
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["menu_item"]["id"], id);
        assert_eq!(res.body["menu_item"]["image"], "/images/1.png");
        assert_eq!(app.find_menu_item(id).await.unwrap().name, "Margherita");
    }

    #[tokio::test]
    async fn editing_a_missing_row_is_not_found() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;

        let res = app
            .post_multipart(
                &routes::menu_item("edit", 77),
                menu_item_form("Margherita", "9.99", category_id, sub_category_id),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_the_row_but_keeps_the_image() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let id = create_item(
            &app,
            menu_item_form("Margherita", "9.99", category_id, sub_category_id),
        )
        .await;

        let confirm = app.get(&routes::menu_item("delete", id)).await;
        assert_eq!(confirm.status, 200);
        assert_eq!(confirm.body["menu_item"]["name"], "Margherita");

        let res = app.post_form(&routes::menu_item("delete", id), &[]).await;
        res.assert_redirect(routes::MENU_ITEMS);

        let list = app.get(routes::MENU_ITEMS).await;
        assert_eq!(list.body, serde_json::json!([]));
        assert!(app.image_file(&format!("/images/{id}.png")).exists());
    }

    #[tokio::test]
    async fn missing_rows() {
        let app = TestApp::spawn().await;

        for action in ["edit", "delete", "details"] {
            let res = app.get(&routes::menu_item(action, 5)).await;
            assert_eq!(res.status, 404, "{action}: {}", res.text);
        }

        let res = app.post_form(&routes::menu_item("delete", 5), &[]).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, serde_json::json!({}));
    }
}

mod details {
    use super::*;

    #[tokio::test]
    async fn submit_redirects_to_edit() {
        let app = TestApp::spawn().await;
        let (category_id, sub_category_id) = app.seed_pizza().await;
        let id = app
            .insert_menu_item("Margherita", category_id, sub_category_id, None)
            .await;

        let res = app.post_form(&routes::menu_item("details", id), &[]).await;
        res.assert_redirect(&routes::menu_item("edit", id));

        let res = app.post_form("/admin/menu-items/details", &[]).await;
        assert_eq!(res.status, 404);
    }
}

/// Full walk-through: a category, a sub category, then a menu item without a
/// picture that falls back to the placeholder.
#[tokio::test]
async fn pizza_scenario() {
    let app = TestApp::spawn().await;

    app.post_form(routes::CATEGORY_CREATE, &[("name", "Pizza")])
        .await
        .assert_redirect(routes::CATEGORIES);
    let categories = app.get(routes::CATEGORIES).await;
    let category_id = categories.body[0]["id"].as_i64().unwrap() as i32;
    assert_eq!(categories.body[0]["name"], "Pizza");

    let sub_category_id = app.insert_sub_category("Classic", category_id).await;

    let id = create_item(
        &app,
        menu_item_form("Margherita", "9.99", category_id, sub_category_id),
    )
    .await;

    let details = app.get(&routes::menu_item("details", id)).await;
    let image = format!("/images/{id}.png");
    assert_eq!(details.body["menu_item"]["image"], image.as_str());

    let served = app.get_without_token(&image).await;
    assert_eq!(served.status, 200);
    assert_eq!(std::fs::read(app.image_file(&image)).unwrap(), PLACEHOLDER);
}
