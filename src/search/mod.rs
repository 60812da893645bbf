pub mod form;
pub mod pagination;
pub mod scroll;
pub mod session;
pub mod validator;

pub use form::{Field, FieldError, FormController, Location, MemoryLocation, SearchCriteria};
pub use pagination::{FetchKind, FetchRequest, PaginationController, PaginationState, Phase, RequestToken, Resolution};
pub use scroll::{ScrollMetrics, ScrollSignal, ScrollTrigger, Subscription};
pub use session::{Handled, SearchSession, SessionEvent, SessionOptions};
pub use validator::{validate, FormErrors, YearRule};
