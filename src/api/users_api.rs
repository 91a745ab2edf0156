use uuid::Uuid;

use crate::error::Result;
use crate::gateway::{ApiClient, RequestOptions};
use crate::models::{Empty, UpdateUserRequest, UserListResponse, UserResponse};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// `/v1/users/*` endpoints: the caller's own profile plus the admin operations.
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        UsersApi { client }
    }

    pub async fn get_me(&self) -> Result<UserResponse> {
        self.client.request("/v1/users/me", RequestOptions::get()).await
    }

    pub async fn update_me(&self, data: &UpdateUserRequest) -> Result<UserResponse> {
        self.client
            .request("/v1/users/me", RequestOptions::patch().json(data)?)
            .await
    }

    // Admin endpoints

    /// One page of users, e.g. `list(2, 10)` → `GET /v1/users?page=2&page_size=10`.
    pub async fn list(&self, page: u32, page_size: u32) -> Result<UserListResponse> {
        self.client
            .request(
                "/v1/users",
                RequestOptions::get()
                    .param("page", page)
                    .param("page_size", page_size),
            )
            .await
    }

    /// First page with the backend's default page size.
    pub async fn list_first_page(&self) -> Result<UserListResponse> {
        self.list(DEFAULT_PAGE, DEFAULT_PAGE_SIZE).await
    }

    pub async fn get_by_id(&self, id: &Uuid) -> Result<UserResponse> {
        self.client
            .request(&format!("/v1/users/{}", id), RequestOptions::get())
            .await
    }

    pub async fn activate(&self, id: &Uuid) -> Result<UserResponse> {
        self.client
            .request(&format!("/v1/users/{}/activate", id), RequestOptions::post())
            .await
    }

    pub async fn suspend(&self, id: &Uuid) -> Result<UserResponse> {
        self.client
            .request(&format!("/v1/users/{}/suspend", id), RequestOptions::post())
            .await
    }

    pub async fn delete(&self, id: &Uuid) -> Result<()> {
        self.client
            .request::<Empty>(&format!("/v1/users/{}", id), RequestOptions::delete())
            .await?;
        Ok(())
    }
}
