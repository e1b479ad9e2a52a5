pub mod interview_repo;

pub use interview_repo::InterviewRepo;
