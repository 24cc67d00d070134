//! Business-logic services.

pub mod access;
pub mod comment;
pub mod directory;
pub mod email;
pub mod enrollment;
pub mod event;
pub mod news;
pub mod reaction;
pub mod team;
pub mod upload;
pub mod user;

pub use access::{can_mutate, ensure_admin, ensure_can_mutate};
pub use comment::{
    CommentAuthor, CommentListPage, CommentService, CommentView, CreateCommentInput,
    FlaggedComment,
};
pub use directory::{CreateListingInput, DirectoryService, UpdateListingInput};
pub use email::EmailService;
pub use enrollment::{EnrollmentService, SubmitEnrollmentInput};
pub use event::{
    derive_is_active, end_of_day, CreateEventInput, EventService, RsvpInput, SweepOutcome,
    UpdateEventInput,
};
pub use news::{CreateArticleInput, NewsService, UpdateArticleInput};
pub use reaction::{resolve_toggle, ReactionService, ReactionSummary, ToggleAction};
pub use team::{CreateTeamMemberInput, TeamService, UpdateTeamMemberInput};
pub use upload::UploadService;
pub use user::{RegisterInput, UpdateProfileInput, UserService};
