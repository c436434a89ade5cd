//! Record shapes used by the walkthroughs and the `sift` binary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce::deserialize_timestamp;
use crate::filter::{CmpOp, Predicate};
use crate::schema::Field;
use crate::search::DomainFilters;
use crate::value::Literal;
use crate::{SearchTag, Searchable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SearchTag)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SearchTag)]
pub enum Role {
    Admin,
    Buddy,
    /// Customer service and knowledge staff.
    #[serde(rename = "CSKH")]
    #[search(rename = "CSKH")]
    Cskh,
    Partner,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Searchable)]
#[serde(rename_all = "camelCase")]
#[search(shape = "users", rename_all = "camelCase", default_sort = "createdAt")]
pub struct User {
    pub id: i32,
    #[search(text)]
    pub full_name: String,
    #[search(text)]
    pub email: String,
    #[serde(default, skip_serializing)]
    #[search(skip)]
    pub password: String,
    pub gender: Gender,
    pub role: Role,
    #[search(text)]
    pub phone_number: Option<String>,
    #[search(text)]
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub about_me: Option<String>,
    pub profile_picture: Option<String>,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Searchable)]
#[serde(rename_all = "camelCase")]
#[search(shape = "contacts", rename_all = "camelCase", default_sort = "createdAt")]
pub struct Contact {
    pub id: i32,
    #[search(text)]
    pub name: String,
    #[search(text)]
    pub gmail: String,
    #[search(text)]
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Typed user filters that sit beside the generic criteria on a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_to: Option<DateTime<Utc>>,
}

impl DomainFilters<User> for UserFilters {
    fn predicates(&self) -> Vec<Predicate<User>> {
        let mut predicates = Vec::new();
        if let Some(gender) = self.gender {
            predicates.push(Predicate::eq(User::GENDER, Literal::Tag(gender.index())));
        }
        if let Some(verified) = self.is_email_verified {
            predicates.push(Predicate::eq(User::IS_EMAIL_VERIFIED, Literal::Bool(verified)));
        }
        predicates.extend(created_between(User::CREATED_AT, self.created_from, self.created_to));
        predicates
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilters {
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_to: Option<DateTime<Utc>>,
}

impl DomainFilters<Contact> for ContactFilters {
    fn predicates(&self) -> Vec<Predicate<Contact>> {
        created_between(Contact::CREATED_AT, self.created_from, self.created_to).collect()
    }
}

/// Inclusive bounds on a timestamp field.
fn created_between<R>(
    field: Field<R>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> impl Iterator<Item = Predicate<R>> {
    let lower = from.map(|from| Predicate::compare(field, CmpOp::Ge, Literal::Timestamp(from)));
    let upper = to.map(|to| Predicate::compare(field, CmpOp::Le, Literal::Timestamp(to)));
    lower.into_iter().chain(upper)
}

/// A user as returned from a search: everything except the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub gender: Gender,
    pub role: Role,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub about_me: Option<String>,
    pub profile_picture: Option<String>,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            gender: user.gender,
            role: user.role,
            phone_number: user.phone_number,
            address: user.address,
            date_of_birth: user.date_of_birth,
            about_me: user.about_me,
            profile_picture: user.profile_picture,
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub gmail: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            gmail: contact.gmail,
            phone_number: contact.phone_number,
            created_at: contact.created_at,
        }
    }
}
