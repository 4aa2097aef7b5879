//! Win 4 payout table for a $1 bet.

pub struct PayoutConfig {
    pub straight: u32,
    /// 24-way box (all four digits unique)
    pub box_24: u32,
    /// 12-way box (one pair)
    pub box_12: u32,
    /// 6-way box (two pairs)
    pub box_6: u32,
    /// 4-way box (triple)
    pub box_4: u32,
}

pub const PAYOUTS: PayoutConfig = PayoutConfig {
    straight: 5000,
    box_24: 208,
    box_12: 416,
    box_6: 833,
    box_4: 1250,
};
