//! Deterministic sample records for the walkthroughs and the binary.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::examples::models::{Contact, Gender, Role, User};

/// 2024-01-01T00:00:00Z; every sample timestamp is an offset from here.
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

type UserRow = (
    &'static str,
    &'static str,
    Gender,
    Role,
    Option<&'static str>,
    Option<&'static str>,
    bool,
);

const USERS: &[UserRow] = &[
    (
        "Nguyen Van An",
        "an.nguyen@bonddy.vn",
        Gender::Male,
        Role::Admin,
        Some("0901000001"),
        Some("12 Le Loi, District 1, Ho Chi Minh City"),
        true,
    ),
    (
        "Tran Thi Binh",
        "binh.tran@bonddy.vn",
        Gender::Female,
        Role::Buddy,
        Some("0901000002"),
        Some("45 Hai Ba Trung, Hanoi"),
        true,
    ),
    (
        "Le Hoang Cuong",
        "cuong.le@gmail.com",
        Gender::Male,
        Role::Cskh,
        None,
        Some("8 Tran Phu, Da Nang"),
        false,
    ),
    (
        "Pham Minh Chau",
        "chau.pham@gmail.com",
        Gender::Female,
        Role::Partner,
        Some("0901000004"),
        None,
        true,
    ),
    (
        "Hoang Gia Bao",
        "bao.hoang@bonddy.vn",
        Gender::Male,
        Role::User,
        Some("0901000005"),
        Some("99 Nguyen Hue, Ho Chi Minh City"),
        false,
    ),
    ("Vu Thu Ha", "ha.vu@gmail.com", Gender::Female, Role::User, None, None, false),
    (
        "Dang Quoc Viet",
        "viet.dang@bonddy.vn",
        Gender::Other,
        Role::Buddy,
        Some("0901000007"),
        Some("21 Ly Thuong Kiet, Hue"),
        true,
    ),
    (
        "Bui Ngoc Lan",
        "lan.bui@gmail.com",
        Gender::Female,
        Role::Cskh,
        Some("0901000008"),
        Some("3 Bach Dang, Da Nang"),
        true,
    ),
    (
        "Do Thanh Tung",
        "tung.do@bonddy.vn",
        Gender::Male,
        Role::Partner,
        None,
        Some("17 Ham Nghi, Ho Chi Minh City"),
        false,
    ),
    (
        "Ngo Phuong Mai",
        "mai.ngo@gmail.com",
        Gender::Female,
        Role::User,
        Some("0901000010"),
        Some("60 Kim Ma, Hanoi"),
        true,
    ),
];

/// Ten users with ids 1..=10, created one day apart in id order.
///
/// Odd ids have a date of birth and an `updated_at`; even ids have neither.
pub fn sample_users() -> Vec<User> {
    let base = base_time();
    USERS
        .iter()
        .zip(1..)
        .map(|(&(full_name, email, gender, role, phone, address, verified), id)| {
            let odd = id % 2 == 1;
            User {
                id,
                full_name: full_name.to_string(),
                email: email.to_string(),
                password: format!("$argon2id$sample${id}"),
                gender,
                role,
                phone_number: phone.map(str::to_string),
                address: address.map(str::to_string),
                date_of_birth: if odd {
                    NaiveDate::from_ymd_opt(1985 + id, 1 + (id as u32 % 12), 10)
                } else {
                    None
                },
                about_me: odd.then(|| format!("Hi, I am {full_name}")),
                profile_picture: None,
                is_email_verified: verified,
                created_at: base + Duration::days(i64::from(id)),
                updated_at: odd.then(|| base + Duration::days(i64::from(id) + 30)),
            }
        })
        .collect()
}

/// `count` contacts with ids 1..=count, contact `n` created `n - 1` hours
/// after [`base_time`].
pub fn sample_contacts(count: i32) -> Vec<Contact> {
    let base = base_time();
    (1..=count)
        .map(|id| Contact {
            id,
            name: format!("Contact {id:02}"),
            gmail: format!("contact{id:02}@gmail.com"),
            phone_number: format!("09120000{id:02}"),
            created_at: base + Duration::hours(i64::from(id - 1)),
        })
        .collect()
}
