use super::{FieldKind, FieldRule, Schema};

const HANDLE: FieldKind = FieldKind::String { min: 1, max: Some(25) };
const NON_EMPTY: FieldKind = FieldKind::String { min: 1, max: None };
const TEXT: FieldKind = FieldKind::String { min: 0, max: None };
// salary and num_employees are INTEGER columns
const COUNT: FieldKind = FieldKind::Integer { min: 0, max: i32::MAX as i64 };
const EQUITY: FieldKind = FieldKind::Number { min: 0.0, max: 1.0 };
const USERNAME: FieldKind = FieldKind::String { min: 1, max: Some(25) };
const PASSWORD: FieldKind = FieldKind::String { min: 5, max: Some(20) };
const PERSON_NAME: FieldKind = FieldKind::String { min: 1, max: Some(30) };
const EMAIL: FieldKind = FieldKind::Email { min: 6, max: 60 };

pub const COMPANY_NEW: Schema = Schema {
    name: "companyNew",
    fields: &[
        FieldRule::new("handle", HANDLE).required(),
        FieldRule::new("name", NON_EMPTY).required(),
        FieldRule::new("description", TEXT).required(),
        FieldRule::new("numEmployees", COUNT).nullable(),
        FieldRule::new("logoUrl", FieldKind::Uri).nullable(),
    ],
};

pub const COMPANY_UPDATE: Schema = Schema {
    name: "companyUpdate",
    fields: &[
        FieldRule::new("name", NON_EMPTY),
        FieldRule::new("description", TEXT),
        FieldRule::new("numEmployees", COUNT).nullable(),
        FieldRule::new("logoUrl", FieldKind::Uri).nullable(),
    ],
};

pub const JOB_NEW: Schema = Schema {
    name: "jobNew",
    fields: &[
        FieldRule::new("title", NON_EMPTY).required(),
        FieldRule::new("salary", COUNT).nullable(),
        FieldRule::new("equity", EQUITY).nullable(),
        FieldRule::new("companyHandle", HANDLE).required(),
    ],
};

pub const JOB_UPDATE: Schema = Schema {
    name: "jobUpdate",
    fields: &[
        FieldRule::new("title", NON_EMPTY),
        FieldRule::new("salary", COUNT).nullable(),
        FieldRule::new("equity", EQUITY).nullable(),
    ],
};

pub const USER_NEW: Schema = Schema {
    name: "userNew",
    fields: &[
        FieldRule::new("username", USERNAME).required(),
        FieldRule::new("password", PASSWORD).required(),
        FieldRule::new("firstName", PERSON_NAME).required(),
        FieldRule::new("lastName", PERSON_NAME).required(),
        FieldRule::new("email", EMAIL).required(),
        FieldRule::new("isAdmin", FieldKind::Boolean),
    ],
};

pub const USER_REGISTER: Schema = Schema {
    name: "userRegister",
    fields: &[
        FieldRule::new("username", USERNAME).required(),
        FieldRule::new("password", PASSWORD).required(),
        FieldRule::new("firstName", PERSON_NAME).required(),
        FieldRule::new("lastName", PERSON_NAME).required(),
        FieldRule::new("email", EMAIL).required(),
    ],
};

pub const USER_UPDATE: Schema = Schema {
    name: "userUpdate",
    fields: &[
        FieldRule::new("password", PASSWORD),
        FieldRule::new("firstName", PERSON_NAME),
        FieldRule::new("lastName", PERSON_NAME),
        FieldRule::new("email", EMAIL),
    ],
};

pub const USER_AUTH: Schema = Schema {
    name: "userAuth",
    fields: &[
        FieldRule::new("username", USERNAME).required(),
        FieldRule::new("password", NON_EMPTY).required(),
    ],
};
