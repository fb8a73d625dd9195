// Domain Layer - Entities, status enums and validation rules

pub mod application;
pub mod contract;
pub mod enums;
pub mod error;
pub mod job;
pub mod review;
pub mod search;
pub mod ticket;
pub mod user;
pub mod validation;

// Re-exports
pub use application::{Application, ApplicationDraft, ApplicationId, NewApplication};
pub use contract::{Contract, ContractDraft, ContractId, ContractTerms, NewContract};
pub use enums::{
    ApplicationStatus, ContractStatus, JobCategory, JobStatus, PayType, PaymentStatus,
    TicketPriority, TicketStatus, UserRole, WireEnum,
};
pub use error::DomainError;
pub use job::{CompanySummary, Job, JobDraft, JobId, JobWithCompany, NewJob};
pub use review::{NewReview, Review, ReviewDraft, ReviewId};
pub use search::{JobSearch, Page, TalentSearch, TalentSummary};
pub use ticket::{NewTicket, Ticket, TicketDraft, TicketId};
pub use user::{NewUser, User, UserDraft, UserId, UserUpdate, ValidatedUser};
pub use validation::{ValidationErrors, ValidationIssue};
