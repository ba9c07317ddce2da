//! Client core for the Conecta Saber tutoring service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ApiClient` holds the base URL and owns the `SessionStore`; every
//!   request it builds samples the bearer token fresh from the store.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Input validation runs before a request is built; invalid input never
//!   reaches the wire.
//! - Appointment statuses are a closed enum with a checked transition, and
//!   list state goes through `ListView`, which applies each completed fetch
//!   as a full replace and discards stale responses.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod status;
pub mod types;
pub mod validate;
pub mod view;

pub use client::ApiClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, SessionStore};
pub use status::{AppointmentStatus, Decision, RespondRequest};
pub use types::{
    Appointment, CreateAppointment, CreateOffer, LoginRequest, LoginResponse, Offer,
    PendingRequest, RegisterRequest, Role, User,
};
pub use view::{ListView, Ticket};
