use crate::validation::{Check, FieldRules, Rule};

use super::dto::Gender;

pub const EMAIL_TAKEN: &str = "Email already exists";

/// Rules applied to both create and update payloads.
pub const USER_RULES: &[FieldRules] = &[
    FieldRules {
        field: "name",
        rules: &[
            Rule::new(Check::Required, "Name is required"),
            Rule::new(Check::String, "The name field must be a string."),
            Rule::new(
                Check::Max(255),
                "The name field must not be greater than 255 characters.",
            ),
        ],
    },
    FieldRules {
        field: "email",
        rules: &[
            Rule::new(Check::Required, "Email is required"),
            Rule::new(Check::Email, "Email must be a valid email address"),
            Rule::new(
                Check::Max(255),
                "The email field must not be greater than 255 characters.",
            ),
            Rule::new(Check::Unique("email"), EMAIL_TAKEN),
        ],
    },
    FieldRules {
        field: "address",
        rules: &[
            Rule::new(Check::Required, "Address is required"),
            Rule::new(Check::String, "The address field must be a string."),
            Rule::new(
                Check::Max(255),
                "The address field must not be greater than 255 characters.",
            ),
        ],
    },
    FieldRules {
        field: "gender",
        rules: &[
            Rule::new(Check::Required, "Gender is required"),
            Rule::new(
                Check::In(Gender::NAMES),
                "Gender must be one of the following: Male, Female, Other",
            ),
        ],
    },
    FieldRules {
        field: "phone",
        rules: &[
            Rule::new(Check::Required, "Phone is required"),
            Rule::new(Check::String, "The phone field must be a string."),
            Rule::new(Check::Digits, "Phone number must contain only digits"),
            Rule::new(Check::Max(15), "Phone number must not exceed 15 characters"),
        ],
    },
];
