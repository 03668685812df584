pub mod capability;
pub mod domain;
pub mod guard;
pub mod ports;
pub mod validation;

pub use capability::{allows, can_mutate, Capability};
pub use domain::{Country, Creator, Item, Role, Session, User};
pub use guard::{guard, resolve, Route, RouteDecision};
pub use ports::{
    ApiRequest, ApiResponse, HttpTransport, KeyValueStore, Method, PortError, PortResult, Prompt,
};
pub use validation::{RegistrationForm, ValidationError};
