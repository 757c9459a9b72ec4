use serde::{Deserialize, Serialize};
use crate::lib_constants::{DEFAULT_ARGON2_M_COST, DEFAULT_ARGON2_P_COST, DEFAULT_ARGON2_T_COST};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OracleConfigData {
    #[serde(default = "oracle_config_default_argon2_m_cost")]
    pub argon2_m_cost: u32,

    #[serde(default = "oracle_config_default_argon2_t_cost")]
    pub argon2_t_cost: u32,

    #[serde(default = "oracle_config_default_argon2_p_cost")]
    pub argon2_p_cost: u32,
}

pub fn oracle_config_default_argon2_m_cost() -> u32 {
    DEFAULT_ARGON2_M_COST
}

pub fn oracle_config_default_argon2_t_cost() -> u32 {
    DEFAULT_ARGON2_T_COST
}

pub fn oracle_config_default_argon2_p_cost() -> u32 {
    DEFAULT_ARGON2_P_COST
}

impl TryFrom<&OracleConfigData> for argon2::Params {
    type Error = argon2::Error;
    fn try_from(value: &OracleConfigData) -> Result<Self, Self::Error> {
        argon2::Params::new(
            value.argon2_m_cost,
            value.argon2_t_cost,
            value.argon2_p_cost,
            None,
        )
    }
}

impl Default for OracleConfigData {
    fn default() -> Self {
        OracleConfigData {
            argon2_m_cost: DEFAULT_ARGON2_M_COST,
            argon2_t_cost: DEFAULT_ARGON2_T_COST,
            argon2_p_cost: DEFAULT_ARGON2_P_COST,
        }
    }
}
