pub mod documents;
pub mod onboarding;
pub mod submissions;
