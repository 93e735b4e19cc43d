/// Identifier allocation for posts and accounts.
pub trait IdGenerator: Send + Sync {
    /// Return an identifier never handed out before by this generator.
    fn next_id(&self) -> String;
}
