//! services/app/src/client/protocol.rs
//!
//! Defines the JSON payloads exchanged with the remote API and the paths
//! they are sent to.

use dashboard_core::domain::{Country, Item, User};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Endpoints
//=========================================================================================

pub const LOGIN_PATH: &str = "/user/login";
pub const REGISTER_PATH: &str = "/user/register";
pub const COUNTRY_PATH: &str = "/user/country";
pub const ITEMS_PATH: &str = "/data";

pub fn item_path(id: &str) -> String {
    format!("{}/{}", ITEMS_PATH, id)
}

//=========================================================================================
// Messages Sent TO the API
//=========================================================================================

#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct CountryRequest {
    pub country: Country,
}

/// Body of both item creation and item rename.
#[derive(Serialize, Debug)]
pub struct ItemRequest<'a> {
    pub name: &'a str,
}

//=========================================================================================
// Messages Received FROM the API
//=========================================================================================

/// Returned by login and by a country update; both replace the whole session.
#[derive(Deserialize, Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Returned by registration. The new account is not signed in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegisterResponse {
    pub user: User,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemList {
    pub data: Vec<Item>,
}
