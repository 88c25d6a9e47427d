use crate::types::Millis;
use serde::{Deserialize, Serialize};

/// Guest record, welcome bonus and login defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// When true, a fresh store starts with a nameless guest record
    /// holding `guest_balance` instead of no user at all.
    pub seed_guest_record: bool,
    pub guest_balance: f64,
    pub welcome_bonus: f64,
    pub default_profile_picture: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeConfig {
    pub min: f64,
    /// Increment applied by the +/- stake controls.
    pub step: f64,
    /// Fixed upper bound; the live balance caps the stake as well.
    #[serde(default)]
    pub cap: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositConfig {
    pub min: f64,
    pub max: f64,
    pub quick_values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub id: String,
    pub icon: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotMachineConfig {
    pub win_probability: f64,
    pub symbols: Vec<SymbolConfig>,
    pub reveal_delay_min_ms: Millis,
    pub reveal_delay_max_ms: Millis,
    /// Pause between the last reel stopping and the payout.
    pub settle_delay_ms: Millis,
    pub fallback_stake: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MinerTier {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerTierConfig {
    pub tier: MinerTier,
    pub bombs: usize,
    pub diamonds: usize,
    pub diamond_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerConfig {
    pub rows: usize,
    pub cols: usize,
    pub default_tier: MinerTier,
    pub tiers: Vec<MinerTierConfig>,
    pub fallback_stake: f64,
}

impl MinerConfig {
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn tier(&self, tier: MinerTier) -> Option<&MinerTierConfig> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocketConfig {
    pub start_multiplier: f64,
    pub step: f64,
    pub tick_ms: Millis,
    /// Explosion point is drawn as 1 + u1 * u2 * scale.
    pub explosion_scale: f64,
    pub fallback_stake: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasinoConfig {
    pub wallet: WalletConfig,
    pub stake: StakeConfig,
    pub deposit: DepositConfig,
    pub slot_machine: SlotMachineConfig,
    pub miner: MinerConfig,
    pub rocket: RocketConfig,
}

impl CasinoConfig {
    /// Load from the data/ directory.
    /// In tests, use CasinoConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/casino.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: CasinoConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.slot_machine.symbols.is_empty() {
            anyhow::bail!("slot_machine.symbols must not be empty");
        }
        if self.slot_machine.reveal_delay_min_ms > self.slot_machine.reveal_delay_max_ms {
            anyhow::bail!("slot_machine reveal delay range is inverted");
        }
        if !(0.0..=1.0).contains(&self.slot_machine.win_probability) {
            anyhow::bail!("slot_machine.win_probability must be within [0, 1]");
        }
        for tier in &self.miner.tiers {
            if tier.bombs + tier.diamonds > self.miner.cells() {
                anyhow::bail!(
                    "miner tier {:?} places {} cells on a {}-cell grid",
                    tier.tier,
                    tier.bombs + tier.diamonds,
                    self.miner.cells()
                );
            }
        }
        if self.miner.tier(self.miner.default_tier).is_none() {
            anyhow::bail!("miner.default_tier {:?} has no tier entry", self.miner.default_tier);
        }
        if self.rocket.tick_ms == 0 {
            anyhow::bail!("rocket.tick_ms must be > 0");
        }
        if self.deposit.min > self.deposit.max {
            anyhow::bail!("deposit range is inverted");
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Matches data/casino.json.
    pub fn default_test() -> Self {
        let symbol = |id: &str, icon: &str, multiplier: f64| SymbolConfig {
            id: id.into(),
            icon: icon.into(),
            multiplier,
        };
        Self {
            wallet: WalletConfig {
                seed_guest_record: true,
                guest_balance: 1_500_000.0,
                welcome_bonus: 20.0,
                default_profile_picture: "https://i.pinimg.com/736x/52/40/ff/5240ff1e8f7be882259b40782086ae65.jpg".into(),
            },
            stake: StakeConfig { min: 0.25, step: 0.5, cap: None },
            deposit: DepositConfig {
                min: 0.25,
                max: 2000.0,
                quick_values: vec![10.0, 25.0, 50.0, 100.0, 200.0, 500.0],
            },
            slot_machine: SlotMachineConfig {
                win_probability: 0.13,
                symbols: vec![
                    symbol("cherry", "🍒", 2.0),
                    symbol("lemon", "🍋", 3.0),
                    symbol("apple", "🍏", 4.0),
                    symbol("ice", "🧊", 5.0),
                    symbol("star", "⭐", 10.0),
                    symbol("dollar", "💲", 50.0),
                ],
                reveal_delay_min_ms: 1000,
                reveal_delay_max_ms: 3000,
                settle_delay_ms: 350,
                fallback_stake: 0.0,
            },
            miner: MinerConfig {
                rows: 4,
                cols: 5,
                default_tier: MinerTier::Medium,
                tiers: vec![
                    MinerTierConfig { tier: MinerTier::Easy,   bombs: 5,  diamonds: 15, diamond_multiplier: 1.0 },
                    MinerTierConfig { tier: MinerTier::Medium, bombs: 8,  diamonds: 12, diamond_multiplier: 1.55 },
                    MinerTierConfig { tier: MinerTier::Hard,   bombs: 12, diamonds: 8,  diamond_multiplier: 2.25 },
                ],
                fallback_stake: 0.0,
            },
            rocket: RocketConfig {
                start_multiplier: 0.3,
                step: 0.05,
                tick_ms: 200,
                explosion_scale: 10.0,
                fallback_stake: 10.0,
            },
        }
    }
}
