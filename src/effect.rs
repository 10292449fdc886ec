//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch one roster page from `{base_url}/pokemon`
    FetchPage {
        base_url: String,
        offset: u32,
        limit: u32,
    },
    /// POST credentials to `{base_url}/login`
    Login {
        base_url: String,
        username: String,
        password: String,
    },
    /// POST credentials to `{base_url}/register`
    Register {
        base_url: String,
        username: String,
        password: String,
    },
}
