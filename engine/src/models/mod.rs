// Engine-side request/response types handed to and from a presenter.
// Row-level types (Bar, PriceSeries, ...) live in `shared::models`.
pub mod request;
pub mod snapshot;

pub use request::DashboardRequest;
pub use snapshot::{DashboardSnapshot, RefreshOutcome};
