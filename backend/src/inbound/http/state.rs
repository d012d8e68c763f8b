//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ActivityRepository, AuthProvider, BookingRepository, CommentRepository,
    DestinationRepository, PostRepository, TripRepository, UserRepository,
};
use crate::domain::{
    ActivityService, AuthService, BookingService, CommentService, DestinationService,
    PostService, ProfileService, TripService,
};

/// Parameter object bundling every driven port implementation.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Managed auth provider.
    pub auth: Arc<dyn AuthProvider>,
    /// `users` and `user_follows`.
    pub users: Arc<dyn UserRepository>,
    /// `trips`.
    pub trips: Arc<dyn TripRepository>,
    /// `destinations`.
    pub destinations: Arc<dyn DestinationRepository>,
    /// `activities`, `activity_types` and ratings.
    pub activities: Arc<dyn ActivityRepository>,
    /// `bookings` and `booking_types`.
    pub bookings: Arc<dyn BookingRepository>,
    /// `posts` and `post_likes`.
    pub posts: Arc<dyn PostRepository>,
    /// `comments`.
    pub comments: Arc<dyn CommentRepository>,
}

impl HttpStatePorts {
    /// Use one adapter for every port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use roamwise::inbound::http::state::HttpStatePorts;
    /// use roamwise::outbound::memory::InMemoryBackend;
    ///
    /// let ports = HttpStatePorts::from_backend(Arc::new(InMemoryBackend::default()));
    /// let _trips = ports.trips.clone();
    /// ```
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: AuthProvider
            + UserRepository
            + TripRepository
            + DestinationRepository
            + ActivityRepository
            + BookingRepository
            + PostRepository
            + CommentRepository
            + 'static,
    {
        Self {
            auth: backend.clone(),
            users: backend.clone(),
            trips: backend.clone(),
            destinations: backend.clone(),
            activities: backend.clone(),
            bookings: backend.clone(),
            posts: backend.clone(),
            comments: backend,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// `/api/auth` and the authentication extractor.
    pub auth: AuthService,
    /// `/api/users`.
    pub profiles: ProfileService,
    /// `/api/trips`.
    pub trips: TripService,
    /// `/api/destinations`.
    pub destinations: DestinationService,
    /// `/api/activities`.
    pub activities: ActivityService,
    /// `/api/bookings`.
    pub bookings: BookingService,
    /// `/api/posts`.
    pub posts: PostService,
    /// `/api/comments`.
    pub comments: CommentService,
}

impl HttpState {
    /// Build every service over the given ports.
    pub fn new(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            auth,
            users,
            trips,
            destinations,
            activities,
            bookings,
            posts,
            comments,
        } = ports;
        Self {
            auth: AuthService::new(auth, users.clone(), clock.clone()),
            profiles: ProfileService::new(
                users.clone(),
                trips.clone(),
                posts.clone(),
                clock.clone(),
            ),
            trips: TripService::new(trips.clone(), clock.clone()),
            destinations: DestinationService::new(destinations, clock.clone()),
            activities: ActivityService::new(activities, clock.clone()),
            bookings: BookingService::new(bookings, trips, clock.clone()),
            posts: PostService::new(posts.clone(), comments.clone(), users, clock.clone()),
            comments: CommentService::new(comments, posts, clock),
        }
    }
}
