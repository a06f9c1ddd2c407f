use std::time::Duration;

use api_types::{
    category::{CategoryCreate, CategoryView},
    error::ErrorResponse,
    expense::{ExpenseView, ExpenseWrite},
};
use async_trait::async_trait;
use engine::{
    Amount, Category, CategoryId, Expense, ExpenseId, ExpenseInput, RemoteError, RemoteStore,
};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};


/// [`RemoteStore`] backed by the expense tracker REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url).map_err(|err| AppError::InvalidUrl(err.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Unreachable(format!("invalid endpoint {path}: {err}")))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> std::result::Result<Response, RemoteError> {
        let res = request.send().await.map_err(transport)?;
        let status = res.status();
        tracing::debug!(%status, resource, "remote store replied");
        if status.is_success() {
            return Ok(res);
        }

        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|body| body.message())
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        let err = match status.as_u16() {
            404 => RemoteError::NotFound(resource.to_string()),
            status => RemoteError::Rejected { status, message },
        };
        Err(err)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_expenses(&self) -> std::result::Result<Vec<Expense>, RemoteError> {
        let request = self.http.get(self.endpoint("expenses/")?);
        let res = self.send(request, "expenses").await?;
        let views: Vec<ExpenseView> = decode(res).await?;
        Ok(views.into_iter().map(expense_from_view).collect())
    }

    async fn get_expense(&self, id: ExpenseId) -> std::result::Result<Expense, RemoteError> {
        let request = self.http.get(self.endpoint(&format!("expenses/{id}"))?);
        let res = self.send(request, &format!("expense {id}")).await?;
        decode(res).await.map(expense_from_view)
    }

    async fn create_expense(
        &self,
        input: &ExpenseInput,
    ) -> std::result::Result<Expense, RemoteError> {
        let request = self
            .http
            .post(self.endpoint("expenses/")?)
            .json(&write_body(input));
        let res = self.send(request, "expenses").await?;
        decode(res).await.map(expense_from_view)
    }

    async fn update_expense(
        &self,
        id: ExpenseId,
        input: &ExpenseInput,
    ) -> std::result::Result<Expense, RemoteError> {
        let request = self
            .http
            .put(self.endpoint(&format!("expenses/{id}"))?)
            .json(&write_body(input));
        let res = self.send(request, &format!("expense {id}")).await?;
        decode(res).await.map(expense_from_view)
    }

    async fn delete_expense(&self, id: ExpenseId) -> std::result::Result<(), RemoteError> {
        let request = self.http.delete(self.endpoint(&format!("expenses/{id}"))?);
        self.send(request, &format!("expense {id}")).await?;
        Ok(())
    }

    async fn list_categories(&self) -> std::result::Result<Vec<Category>, RemoteError> {
        let request = self.http.get(self.endpoint("categories/")?);
        let res = self.send(request, "categories").await?;
        let views: Vec<CategoryView> = decode(res).await?;
        Ok(views.into_iter().map(category_from_view).collect())
    }

    async fn create_category(&self, name: &str) -> std::result::Result<Category, RemoteError> {
        let payload = CategoryCreate {
            name: name.to_string(),
        };
        let request = self.http.post(self.endpoint("categories/")?).json(&payload);
        let res = self.send(request, "categories").await?;
        decode(res).await.map(category_from_view)
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Unreachable(err.to_string())
}

async fn decode<T: DeserializeOwned>(res: Response) -> std::result::Result<T, RemoteError> {
    let body = res.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|err| RemoteError::Decode(err.to_string()))
}

fn write_body(input: &ExpenseInput) -> ExpenseWrite {
    ExpenseWrite {
        title: input.title.clone(),
        amount: input.amount.value(),
        category_id: input.category_id.0,
        date: input.date,
        notes: input.notes.clone(),
    }
}

fn expense_from_view(view: ExpenseView) -> Expense {
    Expense {
        id: ExpenseId(view.id),
        title: view.title,
        amount: Amount::new(view.amount),
        category_id: CategoryId(view.category_id),
        date: view.date,
        notes: view.notes,
        category: view.category.map(category_from_view),
    }
}

fn category_from_view(view: CategoryView) -> Category {
    Category::new(view.id, view.name)
}
