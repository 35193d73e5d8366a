pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;

pub use bootcamp::{Bootcamp, BootcampDraft, BootcampInput};
pub use course::{Course, CourseInput};
pub use review::{Review, ReviewInput};
pub use user::{User, UserDraft, UserUpdate};
