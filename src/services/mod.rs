// Outbound collaborators
pub mod geocoder;
pub mod mailer;
pub mod photos;

// Per-entity persistence services (mutations and special queries)
pub mod bootcamps;
pub mod courses;
pub mod reviews;
pub mod users;
