use crate::common::{TestApp, routes};

#[tokio::test]
async fn lists_only_sub_categories_of_the_category() {
    let app = TestApp::spawn().await;
    let (pizza, classic) = app.seed_pizza().await;
    let drinks = app.insert_category("Drinks").await;
    app.insert_sub_category("Soda", drinks).await;

    let res = app.get(&routes::sub_categories_of(pizza)).await;

    assert_eq!(res.status, 200);
    let rows = res.body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], classic);
    assert_eq!(rows[0]["category_id"], pizza);
}

#[tokio::test]
async fn unknown_or_missing_category_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::sub_categories_of(404)).await;
    assert_eq!(res.status, 404);

    let res = app.get("/admin/sub-categories/by-category").await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
