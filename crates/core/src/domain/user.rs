// User Domain Model

use crate::domain::enums::UserRole;
use crate::domain::validation::{RangeRule, TextRule, ValidationErrors, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// User ID (SQLite rowid)
pub type UserId = i64;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,15}$").expect("valid phone regex")
});
static AADHAAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[2-9][0-9]{11}$").expect("valid aadhaar regex"));
static GST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("valid gst regex")
});

const PASSWORD_SPECIALS: &str = "@$!%*?&";
const PASSWORD_MIN_LEN: usize = 8;

const MSG_EMAIL_REQUIRED: &str = "Email is required";
const MSG_EMAIL_FORMAT: &str = "Invalid email format";
const MSG_PASSWORD_SHORT: &str = "Password must be at least 8 characters";
const MSG_PASSWORD_WEAK: &str = "Password must contain at least one uppercase letter, one lowercase letter, one number and one special character";
const MSG_PHONE: &str =
    "Invalid phone number format. Use +[country code][number] or local format.";
const MSG_AADHAAR: &str = "Invalid Aadhaar number. Must be 12 digits and not start with 0 or 1.";
const MSG_GST: &str = "Invalid GST number format. Example: 22AAAAA0000A1Z5";

const NAME: TextRule = TextRule::trimmed(
    2,
    100,
    "Name must be at least 2 characters",
    "Name cannot exceed 100 characters",
);
const BIO: TextRule = TextRule::trimmed(0, 5000, "", "Bio cannot exceed 5000 characters");
const ADDRESS_PART: TextRule =
    TextRule::trimmed(0, 200, "", "Address fields cannot exceed 200 characters");
const EXPERIENCE: RangeRule = RangeRule::new(
    0.0,
    80.0,
    "Experience years cannot be negative",
    "Experience years cannot exceed 80",
);
const HOURLY_RATE: RangeRule = RangeRule::new(
    0.0,
    1_000_000.0,
    "Hourly rate must be positive",
    "Hourly rate is too high",
);

/// Stored user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub profile_photo: Option<String>,
    pub aadhaar_number: Option<String>,
    pub aadhaar_verified: bool,
    pub gst_number: Option<String>,
    pub gst_verified: bool,
    pub is_banned: bool,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub experience_years: Option<i64>,
    pub hourly_rate: Option<i64>,
    pub rating: Option<f64>,
    pub jobs_completed: i64,
    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl User {
    pub fn is_talent(&self) -> bool {
        self.role == UserRole::Talent
    }

    pub fn is_company(&self) -> bool {
        self.role == UserRole::Company
    }
}

/// Registration input as it arrives from a form or JSON body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDraft {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i64>,
    #[serde(default)]
    pub hourly_rate: Option<i64>,
}

impl UserDraft {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Validate and normalize into a record ready for hashing and insert
    pub fn validate(self) -> Result<ValidatedUser, ValidationErrors> {
        let mut v = Validator::new();

        let email = check_email(&mut v, &self.email);
        check_password(&mut v, &self.password);
        let name = v.text("name", &self.name, &NAME);
        let role: UserRole = v.choice("role", self.role.as_deref());
        let phone = check_phone(&mut v, self.phone);
        let aadhaar_number = check_aadhaar(&mut v, self.aadhaar_number);
        let gst_number = check_gst(&mut v, self.gst_number);
        let address = v.optional_text("address", self.address.as_deref(), &ADDRESS_PART);
        let city = v.optional_text("city", self.city.as_deref(), &ADDRESS_PART);
        let state = v.optional_text("state", self.state.as_deref(), &ADDRESS_PART);
        let pincode = v.optional_text("pincode", self.pincode.as_deref(), &ADDRESS_PART);
        let bio = v.optional_text("bio", self.bio.as_deref(), &BIO);
        let experience_years = self
            .experience_years
            .map(|y| v.int_range("experience_years", y, &EXPERIENCE));
        let hourly_rate = self
            .hourly_rate
            .map(|r| v.int_range("hourly_rate", r, &HOURLY_RATE));

        v.finish()?;

        Ok(ValidatedUser {
            email,
            password: self.password,
            profile: NewUser {
                email: String::new(),
                password_hash: String::new(),
                name,
                role,
                phone,
                address,
                city,
                state,
                pincode,
                profile_photo: self.profile_photo,
                aadhaar_number,
                gst_number,
                skills: normalize_skills(self.skills),
                bio,
                experience_years,
                hourly_rate,
            },
        })
    }
}

/// Validated registration still holding the plaintext password
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub email: String,
    pub password: String,
    profile: NewUser,
}

impl ValidatedUser {
    /// Attach the password hash, dropping the plaintext
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            ..self.profile
        }
    }
}

/// Insertable user record
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub profile_photo: Option<String>,
    pub aadhaar_number: Option<String>,
    pub gst_number: Option<String>,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub experience_years: Option<i64>,
    pub hourly_rate: Option<i64>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub aadhaar_verified: Option<bool>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub gst_verified: Option<bool>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i64>,
    #[serde(default)]
    pub hourly_rate: Option<i64>,
}

impl UserUpdate {
    /// Apply the insert-time rule to every present field
    pub fn validate(self) -> Result<UserUpdate, ValidationErrors> {
        let mut v = Validator::new();

        let name = v.optional_text("name", self.name.as_deref(), &NAME);
        let phone = check_phone(&mut v, self.phone);
        let aadhaar_number = check_aadhaar(&mut v, self.aadhaar_number);
        let gst_number = check_gst(&mut v, self.gst_number);
        let address = v.optional_text("address", self.address.as_deref(), &ADDRESS_PART);
        let city = v.optional_text("city", self.city.as_deref(), &ADDRESS_PART);
        let state = v.optional_text("state", self.state.as_deref(), &ADDRESS_PART);
        let pincode = v.optional_text("pincode", self.pincode.as_deref(), &ADDRESS_PART);
        let bio = v.optional_text("bio", self.bio.as_deref(), &BIO);
        let experience_years = self
            .experience_years
            .map(|y| v.int_range("experience_years", y, &EXPERIENCE));
        let hourly_rate = self
            .hourly_rate
            .map(|r| v.int_range("hourly_rate", r, &HOURLY_RATE));

        v.finish()?;

        Ok(UserUpdate {
            name,
            phone,
            address,
            city,
            state,
            pincode,
            profile_photo: self.profile_photo,
            aadhaar_number,
            aadhaar_verified: self.aadhaar_verified,
            gst_number,
            gst_verified: self.gst_verified,
            skills: self.skills.map(normalize_skills),
            bio,
            experience_years,
            hourly_rate,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }
}

/// Lower-cased, trimmed email used for storage and lookups
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn check_email(v: &mut Validator, raw: &str) -> String {
    if raw.is_empty() {
        v.fail("email", MSG_EMAIL_REQUIRED);
        return String::new();
    }
    let email = normalize_email(raw);
    let well_formed = EMAIL_RE.is_match(&email) && !email.starts_with('.') && !email.contains("..");
    if !well_formed {
        v.fail("email", MSG_EMAIL_FORMAT);
    }
    email
}

fn check_password(v: &mut Validator, password: &str) {
    if password.chars().count() < PASSWORD_MIN_LEN {
        v.fail("password", MSG_PASSWORD_SHORT);
        return;
    }
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !(allowed && has_lower && has_upper && has_digit && has_special) {
        v.fail("password", MSG_PASSWORD_WEAK);
    }
}

fn check_phone(v: &mut Validator, phone: Option<String>) -> Option<String> {
    let phone = phone?;
    v.matches("phone", &phone, &PHONE_RE, MSG_PHONE);
    Some(phone)
}

fn check_aadhaar(v: &mut Validator, aadhaar: Option<String>) -> Option<String> {
    let aadhaar = aadhaar?;
    v.matches("aadhaar_number", &aadhaar, &AADHAAR_RE, MSG_AADHAAR);
    Some(aadhaar)
}

fn check_gst(v: &mut Validator, gst: Option<String>) -> Option<String> {
    let gst = gst?.to_uppercase();
    v.matches("gst_number", &gst, &GST_RE, MSG_GST);
    Some(gst)
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for skill in skills {
        let skill = skill.trim();
        // Stored comma-separated, so commas inside one skill would split it
        if skill.is_empty() || skill.contains(',') {
            continue;
        }
        if !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }
    out
}
