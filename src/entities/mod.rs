// Entity Models - the four collections behind the reviews API
//
// Course ──< Section >── Lecturer
//               │
//               └──< Review
//
// A Section is one lecturer teaching one course; reviews are written about
// sections. Each entity knows how to read itself out of a store Document and
// how to render its field map for inserting.

pub mod course;
pub mod lecturer;
pub mod section;
pub mod review;

pub use course::Course;
pub use lecturer::Lecturer;
pub use section::Section;
pub use review::{Review, RATING_RANGE};
