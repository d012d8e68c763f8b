//! Driven ports: the contracts services rely on to reach the managed
//! backend.
//!
//! Each adapter (HTTP to the hosted service, or the in-process store)
//! implements every trait here and reports failures as [`BackendError`].

mod macros;
pub(crate) use macros::define_port_error;

mod activity_repository;
mod auth_provider;
mod backend_error;
mod booking_repository;
mod comment_repository;
mod destination_repository;
mod post_repository;
mod trip_repository;
mod user_repository;

pub use activity_repository::ActivityRepository;
#[cfg(test)]
pub use activity_repository::MockActivityRepository;
pub use auth_provider::AuthProvider;
#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use backend_error::BackendError;
pub use booking_repository::BookingRepository;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use destination_repository::DestinationRepository;
#[cfg(test)]
pub use destination_repository::MockDestinationRepository;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::PostRepository;
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::TripRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
