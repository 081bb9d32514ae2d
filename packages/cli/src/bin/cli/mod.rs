pub mod requirements;
pub mod validate;
pub mod versions;
