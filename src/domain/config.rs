use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Deregister,
}

impl Operation {
    /// Picks the operation from the two flags; exactly one must be set.
    pub fn from_flags(register: bool, deregister: bool) -> Option<Self> {
        match (register, deregister) {
            (true, false) => Some(Self::Register),
            (false, true) => Some(Self::Deregister),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub load_balancer_name: String,
    pub operation: Operation,
    pub region: String,
    pub metadata: MetadataConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_flag_selects_an_operation() {
        assert_eq!(Operation::from_flags(true, false), Some(Operation::Register));
        assert_eq!(Operation::from_flags(false, true), Some(Operation::Deregister));
        assert_eq!(Operation::from_flags(true, true), None);
        assert_eq!(Operation::from_flags(false, false), None);
    }
}
