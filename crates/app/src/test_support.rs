//! In-process expense tracker API for tests.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use api_types::{
    category::{CategoryCreate, CategoryView},
    expense::{ExpenseView, ExpenseWrite},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

pub type SharedBackend = Arc<Mutex<Backend>>;

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

#[derive(Debug, Default)]
pub struct Backend {
    pub expenses: Vec<ExpenseView>,
    pub categories: Vec<CategoryView>,
    pub next_id: i64,
    /// Raw body of the last expense create or update.
    pub last_write: Option<Value>,
}

impl Backend {
    /// Food/Transport with three expenses of 30, 10 and 20.
    pub fn seeded() -> SharedBackend {
        let categories = vec![
            CategoryView {
                id: 1,
                name: "Food".to_string(),
            },
            CategoryView {
                id: 2,
                name: "Transport".to_string(),
            },
        ];
        let mut backend = Backend {
            categories,
            next_id: 10,
            ..Backend::default()
        };
        for (id, title, amount, category_id, day) in [
            (1, "Pizza", 30.0, 1, 1),
            (2, "Bus", 10.0, 2, 2),
            (3, "Groceries", 20.0, 1, 3),
        ] {
            let view = backend.view(
                id,
                ExpenseWrite {
                    title: title.to_string(),
                    amount,
                    category_id,
                    date: date(day),
                    notes: None,
                },
            );
            backend.expenses.push(view);
        }
        Arc::new(Mutex::new(backend))
    }

    fn view(&self, id: i64, body: ExpenseWrite) -> ExpenseView {
        let category = self
            .categories
            .iter()
            .find(|category| category.id == body.category_id)
            .cloned();
        ExpenseView {
            id,
            title: body.title,
            amount: body.amount,
            category_id: body.category_id,
            date: body.date,
            notes: body.notes,
            category,
        }
    }
}

pub fn date(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap()
}

pub async fn spawn_backend(backend: SharedBackend) -> SocketAddr {
    let app = Router::new()
        .route("/expenses/", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/categories/", get(list_categories).post(create_category))
        .with_state(backend);
    spawn_router(app).await
}

pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Expense body as the API sends it, with microseconds on the date.
fn render(view: &ExpenseView) -> Value {
    let mut value = serde_json::to_value(view).unwrap();
    if let Some(Value::String(date)) = value.get_mut("date") {
        date.push_str(".000000");
    }
    value
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Expense not found"})),
    )
}

fn parse_write(body: &Value) -> Result<ExpenseWrite, (StatusCode, Json<Value>)> {
    serde_json::from_value(body.clone()).map_err(|err| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"msg": err.to_string()}]})),
        )
    })
}

async fn list_expenses(State(backend): State<SharedBackend>) -> Json<Value> {
    let backend = backend.lock().unwrap();
    Json(Value::Array(backend.expenses.iter().map(render).collect()))
}

async fn get_expense(State(backend): State<SharedBackend>, Path(id): Path<i64>) -> Reply {
    let backend = backend.lock().unwrap();
    backend
        .expenses
        .iter()
        .find(|expense| expense.id == id)
        .map(|expense| Json(render(expense)))
        .ok_or_else(not_found)
}

async fn create_expense(State(backend): State<SharedBackend>, Json(body): Json<Value>) -> Reply {
    let write = parse_write(&body)?;
    let mut backend = backend.lock().unwrap();
    backend.next_id += 1;
    let view = backend.view(backend.next_id, write);
    backend.expenses.push(view.clone());
    backend.last_write = Some(body);
    Ok(Json(render(&view)))
}

async fn update_expense(
    State(backend): State<SharedBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let write = parse_write(&body)?;
    let mut backend = backend.lock().unwrap();
    let index = backend
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or_else(not_found)?;
    let view = backend.view(id, write);
    backend.expenses[index] = view.clone();
    backend.last_write = Some(body);
    Ok(Json(render(&view)))
}

async fn delete_expense(State(backend): State<SharedBackend>, Path(id): Path<i64>) -> Reply {
    let mut backend = backend.lock().unwrap();
    let index = backend
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or_else(not_found)?;
    let removed = backend.expenses.remove(index);
    Ok(Json(render(&removed)))
}

async fn list_categories(State(backend): State<SharedBackend>) -> Json<Vec<CategoryView>> {
    Json(backend.lock().unwrap().categories.clone())
}

async fn create_category(
    State(backend): State<SharedBackend>,
    Json(body): Json<CategoryCreate>,
) -> Result<Json<CategoryView>, (StatusCode, Json<Value>)> {
    let mut backend = backend.lock().unwrap();
    if backend
        .categories
        .iter()
        .any(|category| category.name == body.name)
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Category already exists"})),
        ));
    }
    backend.next_id += 1;
    let category = CategoryView {
        id: backend.next_id,
        name: body.name,
    };
    backend.categories.push(category.clone());
    Ok(Json(category))
}
