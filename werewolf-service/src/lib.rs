pub mod error;
pub mod image;
pub mod catalog;
pub mod security;

pub use error::ServiceError;
pub use image::{
    ImageStore, ImageStoreConfig, ImageStoreError, ImageUpload, PreparedImage,
    DuplicatePolicy, ImageDigest, UploadPolicy, ReleaseOutcome, ReindexReport,
};
pub use catalog::{
    RoleService, DefaultRoleService,
    DeckService, DefaultDeckService,
};
pub use security::{
    UserService, DefaultUserService,
    PasswordService, DefaultPasswordService,
};
