use rand::Rng;

/// Pool of client identities rotated per request.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    user_agents: Vec<String>,
}

impl IdentityPool {
    /// Create a pool from a list of user agents.
    ///
    /// Returns `None` when the list is empty.
    pub fn new(user_agents: Vec<String>) -> Option<Self> {
        if user_agents.is_empty() {
            None
        } else {
            Some(Self { user_agents })
        }
    }

    /// Pick a user agent uniformly at random.
    pub fn pick(&self) -> &str {
        let idx = rand::thread_rng().gen_range(0..self.user_agents.len());
        &self.user_agents[idx]
    }

    /// All user agents in the pool.
    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> IdentityPool {
        IdentityPool::new(vec![
            "agent-a".to_string(),
            "agent-b".to_string(),
            "agent-c".to_string(),
        ])
        .expect("non-empty pool")
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(IdentityPool::new(Vec::new()).is_none());
    }

    #[test]
    fn test_pick_comes_from_pool() {
        let pool = pool();
        for _ in 0..20 {
            let ua = pool.pick();
            assert!(pool.user_agents().iter().any(|u| u == ua));
        }
    }

    #[test]
    fn test_pick_variation() {
        // Probabilistic, but 50 identical picks out of 3 is vanishingly unlikely
        let pool = pool();
        let first = pool.pick().to_string();
        let all_same = (0..50).all(|_| pool.pick() == first);
        assert!(!all_same, "Expected variation in user agents");
    }
}
