/// Integration tests for the Stockroom API
///
/// These tests exercise the HTTP surface end-to-end against a real
/// database: registration and login, the task authorization policy, the
/// overdue and statistics views, catalogue and supplier CRUD, and the
/// error envelope. They skip themselves when `DATABASE_URL` is unset.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDateTime;
use common::{unique, TestContext};
use serde_json::json;
use stockroom_shared::models::task::{Task, TaskStatus};

fn timestamp(value: &serde_json::Value) -> NaiveDateTime {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn test_register_then_login() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("s1");
    let registered = ctx.register_user(&username, "STAFF").await;

    let id = registered["user"]["id"].as_i64().unwrap();
    assert_eq!(registered["token"], format!("mock-token-{}", id));
    assert_eq!(registered["user"]["username"], username.as_str());
    assert_eq!(registered["user"]["role"], "STAFF");
    assert!(registered["user"].get("password").is_none());

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "username": username,
                "password": "password123",
                "role": "STAFF",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], format!("mock-token-{}", id));
    assert_eq!(body["user"]["id"], id);
}

#[tokio::test]
async fn test_login_accepts_email_as_username() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("mailer");
    ctx.register_user(&username, "MANAGER").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "username": format!("{}@example.com", username),
                "password": "password123",
                "role": "MANAGER",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "login by email failed: {}", body);
    assert_eq!(body["user"]["username"], username.as_str());
}

#[tokio::test]
async fn test_login_role_mismatch_names_both_roles() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("s2");
    ctx.register_user(&username, "STAFF").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "username": username,
                "password": "password123",
                "role": "ADMIN",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("not 'ADMIN'"), "message was: {}", message);
    assert!(message.contains("'STAFF'"), "message was: {}", message);
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("s3");
    ctx.register_user(&username, "STAFF").await;

    // Wrong password and unknown user produce the same message
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"username": username, "password": "wrong", "role": "STAFF"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"username": unique("ghost"), "password": "p", "role": "STAFF"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_duplicate_username_and_email() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("dup");
    ctx.register_user(&username, "STAFF").await;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": username,
                "email": format!("{}@other.example.com", username),
                "password": "password123",
                "role": "STAFF",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");

    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": unique("dup2"),
                "email": format!("{}@example.com", username),
                "password": "password123",
                "role": "STAFF",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_requires_password() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("nopass");
    let (status, body) = ctx
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "role": "STAFF",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password is required");
}

#[tokio::test]
async fn test_current_user_endpoint() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("me");
    let registered = ctx.register_user(&username, "MANAGER").await;

    let (status, body) = ctx
        .request("GET", &format!("/api/auth/me?username={}", username), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], registered["user"]["id"]);
    assert_eq!(body["role"], "MANAGER");

    let ghost = unique("ghost");
    let (status, body) = ctx
        .request("GET", &format!("/api/auth/me?username={}", ghost), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        format!("User not found: {}", ghost)
    );
}

#[tokio::test]
async fn test_create_task_applies_defaults() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m1");
    let staff = unique("st1");
    ctx.register_user(&manager, "MANAGER").await;
    ctx.register_user(&staff, "STAFF").await;

    let task = ctx
        .create_task(&manager, &staff, json!({"title": "Inventory check"}))
        .await;

    assert_eq!(task["title"], "Inventory check");
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["priority"], "MEDIUM");
    assert!(task["dueDate"].is_null());
    assert_eq!(task["createdBy"]["username"], manager.as_str());
    assert_eq!(task["assignedTo"]["username"], staff.as_str());
    assert!(task["createdBy"].get("password").is_none());
}

#[tokio::test]
async fn test_create_task_policy() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m2");
    let staff = unique("st2");
    ctx.register_user(&manager, "MANAGER").await;
    ctx.register_user(&staff, "STAFF").await;

    // Staff may not create tasks, even for themselves
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/tasks?createdBy={}&assignedTo={}", staff, staff),
            Some(json!({"title": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only managers and admins can create tasks");

    // Tasks may only be assigned to staff
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/tasks?createdBy={}&assignedTo={}", manager, manager),
            Some(json!({"title": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tasks can only be assigned to staff members");

    // Missing users are reported before any policy failure
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/tasks?createdBy={}&assignedTo={}", unique("x"), staff),
            Some(json!({"title": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Creator user not found");

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/tasks?createdBy={}&assignedTo={}", manager, unique("x")),
            Some(json!({"title": "t"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Assigned user not found");
}

#[tokio::test]
async fn test_update_and_delete_permissions() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m3");
    let staff = unique("st3");
    let other_staff = unique("st4");
    ctx.register_user(&manager, "MANAGER").await;
    ctx.register_user(&staff, "STAFF").await;
    ctx.register_user(&other_staff, "STAFF").await;

    let task = ctx
        .create_task(&manager, &staff, json!({"title": "Restock"}))
        .await;
    let id = task["id"].as_i64().unwrap();

    // An unrelated staff member may not update
    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}?username={}", id, other_staff),
            Some(json!({"status": "IN_PROGRESS"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("don't have permission"));

    // The assignee may update
    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}?username={}", id, staff),
            Some(json!({"status": "IN_PROGRESS"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "assignee update failed: {}", body);
    assert_eq!(body["status"], "IN_PROGRESS");
    assert_eq!(body["title"], "Restock");

    // The assignee may not delete
    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/api/tasks/{}?username={}", id, staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("don't have permission"));

    // The creator may delete
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/api/tasks/{}?username={}", id, manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("GET", &format!("/api/tasks/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_patch_is_a_valid_update() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m4");
    let staff = unique("st5");
    ctx.register_user(&manager, "MANAGER").await;
    ctx.register_user(&staff, "STAFF").await;

    let task = ctx
        .create_task(
            &manager,
            &staff,
            json!({"title": "Audit", "priority": "HIGH"}),
        )
        .await;
    let id = task["id"].as_i64().unwrap();
    let created_at = timestamp(&task["createdAt"]);
    let original_updated_at = timestamp(&task["updatedAt"]);

    // Ensure the update stamp lands on a later instant than creation
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}?username={}", id, staff),
            Some(json!({})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Audit");
    assert_eq!(body["priority"], "HIGH");
    assert_eq!(body["status"], "PENDING");
    assert!(body["description"].is_null());
    assert!(body["dueDate"].is_null());

    // Only the update stamp moves; creation time is immutable
    assert_eq!(timestamp(&body["createdAt"]), created_at);
    let updated_at = timestamp(&body["updatedAt"]);
    assert!(
        updated_at > original_updated_at,
        "empty patch must bump updatedAt ({} -> {})",
        original_updated_at,
        updated_at
    );
    assert!(updated_at >= created_at);
}

#[tokio::test]
async fn test_overdue_view_and_stats() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m5");
    let staff = unique("st6");
    ctx.register_user(&manager, "MANAGER").await;
    let registered = ctx.register_user(&staff, "STAFF").await;
    let staff_id = registered["user"]["id"].as_i64().unwrap();

    let past = (chrono::Utc::now() - chrono::Duration::hours(1)).naive_utc();
    let task = ctx
        .create_task(
            &manager,
            &staff,
            json!({"title": "Late", "status": "IN_PROGRESS", "dueDate": past}),
        )
        .await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = ctx
        .request("GET", &format!("/api/tasks/overdue/{}", staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let overdue_ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert!(overdue_ids.contains(&id), "task should be overdue");

    let (status, stats) = ctx
        .request("GET", &format!("/api/tasks/stats/{}", staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["inProgress"], 1);
    assert_eq!(stats["overdue"], 1);
    assert_eq!(stats["completed"], 0);

    // The per-status count agrees with the aggregated stats row
    let in_progress =
        Task::count_by_assigned_to_and_status(&ctx.db, staff_id, TaskStatus::InProgress)
            .await
            .unwrap();
    assert_eq!(in_progress, stats["inProgress"].as_i64().unwrap());

    // Completing the task removes it from the overdue view
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/api/tasks/{}?username={}", id, staff),
            Some(json!({"status": "COMPLETED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx
        .request("GET", &format!("/api/tasks/overdue/{}", staff), None)
        .await;
    let overdue_ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert!(!overdue_ids.contains(&id), "completed task is not overdue");

    let (_, stats) = ctx
        .request("GET", &format!("/api/tasks/stats/{}", staff), None)
        .await;
    assert_eq!(stats["inProgress"], 0);
    assert_eq!(stats["overdue"], 0);
    assert_eq!(stats["completed"], 1);

    let completed = Task::count_by_assigned_to_and_status(&ctx.db, staff_id, TaskStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed, 1);
    let in_progress =
        Task::count_by_assigned_to_and_status(&ctx.db, staff_id, TaskStatus::InProgress)
            .await
            .unwrap();
    assert_eq!(in_progress, 0);
}

#[tokio::test]
async fn test_staff_listing() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let staff = unique("st7");
    ctx.register_user(&staff, "STAFF").await;

    let (status, body) = ctx.request("GET", "/api/tasks/staff", None).await;
    assert_eq!(status, StatusCode::OK);

    let listed = body.as_array().unwrap();
    assert!(listed
        .iter()
        .any(|u| u["username"] == staff.as_str() && u["role"] == "STAFF"));
    assert!(listed.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn test_delete_user_referenced_by_tasks_is_rejected() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let manager = unique("m6");
    let staff = unique("st8");
    ctx.register_user(&manager, "MANAGER").await;
    let registered = ctx.register_user(&staff, "STAFF").await;
    let staff_id = registered["user"]["id"].as_i64().unwrap();

    ctx.create_task(&manager, &staff, json!({"title": "Anchor"}))
        .await;

    let (status, body) = ctx
        .request("DELETE", &format!("/api/users/{}", staff_id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User is referenced by existing tasks");

    // A user without tasks deletes cleanly
    let loner = unique("loner");
    let registered = ctx.register_user(&loner, "STAFF").await;
    let loner_id = registered["user"]["id"].as_i64().unwrap();

    let (status, _) = ctx
        .request("DELETE", &format!("/api/users/{}", loner_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("GET", &format!("/api/auth/me?username={}", loner), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_keeps_password_when_absent() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let username = unique("upd");
    let registered = ctx.register_user(&username, "STAFF").await;
    let id = registered["user"]["id"].as_i64().unwrap();

    // Promote to manager without sending a password
    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/api/users/{}", id),
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "role": "MANAGER",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", body);
    assert_eq!(body["role"], "MANAGER");

    // The original password still works
    let (status, _) = ctx
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "username": username,
                "password": "password123",
                "role": "MANAGER",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_lifecycle_and_low_stock() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let owner = unique("owner");
    ctx.register_user(&owner, "MANAGER").await;

    let name = unique("Widget");
    let category = unique("Gadgets");
    let (status, product) = ctx
        .request(
            "POST",
            &format!("/api/products?username={}", owner),
            Some(json!({
                "name": name,
                "category": category,
                "stock": 5,
                "price": 199.99,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", product);
    let id = product["id"].as_i64().unwrap();

    // Threshold defaulted to 10, so stock 5 counts as low
    assert_eq!(product["lowStockThreshold"], 10);
    let (_, low) = ctx.request("GET", "/api/products/low-stock", None).await;
    assert!(low.as_array().unwrap().iter().any(|p| p["id"] == id));

    // Search and category views find it
    let (_, found) = ctx
        .request("GET", &format!("/api/products/search?name={}", name), None)
        .await;
    assert!(found.as_array().unwrap().iter().any(|p| p["id"] == id));

    let (_, by_cat) = ctx
        .request("GET", &format!("/api/products/category/{}", category), None)
        .await;
    assert!(by_cat.as_array().unwrap().iter().any(|p| p["id"] == id));

    // Restocking lifts it out of the low-stock view
    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/products/{}?username={}", id, owner),
            Some(json!({
                "name": name,
                "category": category,
                "stock": 50,
                "price": 199.99,
                "lowStockThreshold": 10,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update failed: {}", updated);
    assert_eq!(updated["stock"], 50);

    let (_, low) = ctx.request("GET", "/api/products/low-stock", None).await;
    assert!(!low.as_array().unwrap().iter().any(|p| p["id"] == id));

    // Delete, then both lookup and delete report the absence
    let (status, _) = ctx
        .request("DELETE", &format!("/api/products/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request("GET", &format!("/api/products/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx
        .request("DELETE", &format!("/api/products/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_product_create_requires_known_user() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/products?username={}", unique("ghost")),
            Some(json!({"name": "Orphan"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_supplier_lifecycle() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let name = unique("Acme");
    let (status, supplier) = ctx
        .request(
            "POST",
            "/api/suppliers",
            Some(json!({
                "name": name,
                "contact": "John Doe",
                "email": "contact@acme.example.com",
                "phone": "123-456-7890",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = supplier["id"].as_i64().unwrap();

    let (status, fetched) = ctx
        .request("GET", &format!("/api/suppliers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["contact"], "John Doe");

    let (_, found) = ctx
        .request("GET", &format!("/api/suppliers/search?name={}", name), None)
        .await;
    assert!(found.as_array().unwrap().iter().any(|s| s["id"] == id));

    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/api/suppliers/{}", id),
            Some(json!({"name": name, "contact": "Jane Smith"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["contact"], "Jane Smith");
    assert!(updated["phone"].is_null());

    let (status, _) = ctx
        .request("DELETE", &format!("/api/suppliers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .request("DELETE", &format!("/api/suppliers/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Supplier not found");
}

#[tokio::test]
async fn test_dashboard_stats_shape() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, stats) = ctx.request("GET", "/api/dashboard/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    for key in ["totalProducts", "lowStockCount", "totalSuppliers", "totalUsers"] {
        assert!(stats[key].as_i64().is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let (status, body) = ctx.request("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
