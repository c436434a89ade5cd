pub mod models;
pub mod support;

pub mod example01_user_search;
pub mod example02_contact_search;
pub mod example03_filter_criteria;

use crate::Searchable;
use models::{Contact, User};

/// Build the demo shapes' schemas so they are listed in the shape registry.
pub fn register_all() {
    User::schema();
    Contact::schema();
}
