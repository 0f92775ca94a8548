// XP and leveling
pub const XP_PER_LEVEL: u64 = 1000;
pub const LEVEL_UP_CURRENCY_BONUS: u64 = 100;
pub const SELF_AWARD_MAX_XP: i64 = 500;

// Engagement validation
pub const MIN_ENGAGEMENT_SECONDS: u32 = 10;
pub const MAX_ENGAGEMENT_SECONDS: u32 = 14_400;
pub const DEFAULT_XP_RATE_PER_MINUTE: f64 = 10.0;
pub const MAX_XP_RATE_PER_MINUTE: f64 = 100.0;
pub const ENGAGEMENT_BASE_XP_CAP: u64 = 500;
pub const ENGAGEMENT_COOLDOWN_SECONDS: i64 = 5 * 60;

// Loot generation
pub const MAX_ITEM_TIER: u32 = 10;
pub const UNIQUE_ROLL_THRESHOLD: f64 = 0.98;
pub const RARE_ROLL_THRESHOLD: f64 = 0.85;
pub const UNCOMMON_ROLL_THRESHOLD: f64 = 0.60;
pub const AFFIX_VALUE_PER_TIER: i64 = 5;
pub const AFFIX_VALUE_JITTER: i64 = 2;

// Crafting costs and salvage values (flux)
pub const RECALIBRATE_COST: u64 = 5;
pub const REFORGE_COST: u64 = 25;
pub const OPTIMIZE_COST: u64 = 50;
pub const DISENCHANT_VALUE_COMMON: u64 = 5;
pub const DISENCHANT_VALUE_UNCOMMON: u64 = 15;
pub const DISENCHANT_VALUE_RARE: u64 = 40;
pub const DISENCHANT_VALUE_UNIQUE: u64 = 100;

// Quest stat gating
pub const BASE_STAT_VALUE: i64 = 10;

// Optimistic store
pub const MAX_COMMIT_RETRIES: u32 = 32;

// Submission archival
pub const ARCHIVE_VERSION_MAGIC: u64 = 0x434c_5351_0000_0001;
pub const ARCHIVE_BATCH_SIZE: usize = 500;
pub const ARCHIVE_RETENTION_SECONDS: i64 = 30 * 24 * 60 * 60;
