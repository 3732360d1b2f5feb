use std::{fmt, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;
use crate::validation::Validated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const NAMES: &'static [&'static str] = &["Male", "Female", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => anyhow::bail!("unknown gender {other:?}"),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five writable fields, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub address: String,
    pub gender: Gender,
    pub phone: String,
}

impl TryFrom<Validated> for UserInput {
    type Error = anyhow::Error;

    fn try_from(mut v: Validated) -> Result<Self, Self::Error> {
        let mut field = |name: &str| v.take(name).with_context(|| format!("validated {name} missing"));
        Ok(Self {
            name: field("name")?,
            email: field("email")?,
            address: field("address")?,
            gender: field("gender")?.parse()?,
            phone: field("phone")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct FoundUserResponse {
    pub message: &'static str,
    pub data: User,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub message: &'static str,
    pub update_user: User,
}
