/// 射击模式
///
/// How the fire input turns into shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FireMode {
    /// 按住持续射击
    #[default]
    Automatic,
    /// 每次按下射击一次
    SemiAutomatic,
    /// 按住蓄力, 松开射击
    ChargeAndRelease,
    Disabled,
}

/// 弹匣不足以支付消耗时的处理方式
///
/// What to do when the clip cannot cover an ammo cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverflowPolicy {
    /// 清空弹匣, 忽略不足的部分
    #[default]
    IgnoreOverflow,
    /// 清空弹匣, 不足的部分从备弹扣除
    FillFromReserve,
    /// 拒绝射击
    Disable,
    /// 备弹严格多于缺口时从备弹扣除, 否则拒绝
    DisableReserveOnly,
}

/// 换弹方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReloadMode {
    /// 弹匣中的剩余弹药退回备弹, 一次装满
    #[default]
    FullClip,
    /// 保留弹匣中的弹药, 一次装满
    PreserveClip,
    /// 逐发装填, 每 `reload_time` 装填一次
    Shotgun,
    /// 停火一段时间后自动逐发装填
    Energy,
    /// 先退回弹匣中的弹药, 再逐发装填
    DumpAndRefill,
}

impl ReloadMode {
    /// 是否逐发装填
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Shotgun | Self::Energy | Self::DumpAndRefill)
    }

    /// 开始换弹时是否把弹匣退回备弹
    pub const fn dumps_clip(self) -> bool {
        matches!(self, Self::FullClip | Self::DumpAndRefill)
    }
}

/// 瞄准输入的解释方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScopeMode {
    /// 按住瞄准
    #[default]
    Hold,
    /// 按一次切换
    Toggle,
}

/// 射击通道: 未瞄准时使用主通道, 瞄准时使用副通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FireChannel {
    Primary,
    Secondary,
}

/// 蓄力时间逐帧累加, 比较时允许的误差
const CHARGE_EPSILON: f32 = 1e-4;

/// 单个射击通道的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParams {
    pub mode: FireMode,
    /// 每秒射击次数, 小于等于 0 时没有冷却
    pub fire_rate: f32,
    pub min_charge: f32,
    pub max_charge: f32,
    /// 超过 `max_charge` 后还能继续按住的时间
    pub overcharge: f32,
    pub ammo_cost: i32,
    pub overflow: OverflowPolicy,
}

impl FireParams {
    pub fn automatic(fire_rate: f32) -> Self {
        Self {
            mode: FireMode::Automatic,
            fire_rate,
            ..Self::default()
        }
    }

    pub fn semi_automatic(fire_rate: f32) -> Self {
        Self {
            mode: FireMode::SemiAutomatic,
            fire_rate,
            ..Self::default()
        }
    }

    pub fn charge_and_release(min_charge: f32, max_charge: f32, overcharge: f32) -> Self {
        Self {
            mode: FireMode::ChargeAndRelease,
            min_charge,
            max_charge,
            overcharge,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            mode: FireMode::Disabled,
            ..Self::default()
        }
    }

    pub fn with_fire_rate(mut self, fire_rate: f32) -> Self {
        self.fire_rate = fire_rate;
        self
    }

    pub fn with_ammo_cost(mut self, ammo_cost: i32) -> Self {
        self.ammo_cost = ammo_cost;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// 射击后的冷却时间
    pub fn cooldown(&self) -> f32 {
        if self.fire_rate > 0.0 {
            1.0 / self.fire_rate
        } else {
            0.0
        }
    }

    /// 蓄力 `charge_time` 秒时应当已经消耗的弹药, 一旦开始蓄力至少为 1
    pub fn charge_ammo_target(&self, charge_time: f32) -> i32 {
        if self.ammo_cost <= 0 {
            return 0;
        }
        let fraction = if self.max_charge > 0.0 {
            (charge_time / self.max_charge).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let target = (self.ammo_cost as f32 * fraction + CHARGE_EPSILON).floor() as i32;
        target.clamp(1, self.ammo_cost)
    }

    /// 蓄力程度, 以 `[min_charge, max_charge]` 归一化到 `[0, 1]`
    pub fn charge_fraction(&self, charge_time: f32) -> f32 {
        let span = self.max_charge - self.min_charge;
        let fraction = if span > 0.0 {
            ((charge_time - self.min_charge) / span).clamp(0.0, 1.0)
        } else if charge_time >= self.min_charge - CHARGE_EPSILON {
            1.0
        } else {
            0.0
        };
        if fraction >= 1.0 - CHARGE_EPSILON {
            1.0
        } else {
            fraction
        }
    }
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            mode: FireMode::Automatic,
            fire_rate: 10.0,
            min_charge: 0.0,
            max_charge: 1.0,
            overcharge: 0.0,
            ammo_cost: 1,
            overflow: OverflowPolicy::IgnoreOverflow,
        }
    }
}

/// 武器配置
///
/// Weapon configuration. Degenerate values are tolerated: a clip size of
/// zero or less means an infinite clip, a negative reserve size means an
/// infinite reserve.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponConfig {
    pub clip_size: i32,
    pub reserve_size: i32,
    pub primary: FireParams,
    pub secondary: FireParams,
    pub reload_mode: ReloadMode,
    pub reload_time: f32,
    pub reload_warmup: f32,
    /// 逐发装填时每次装填的数量
    pub reload_amount: i32,
    /// 换弹结束或被打断后的动作锁定时间
    pub post_reload_delay: f32,
    /// `Energy` 模式下停火多久后开始自动装填
    pub energy_reload_delay: f32,
    pub scope_mode: ScopeMode,
    pub scope_warmup: f32,
    pub scope_cooldown: f32,
    /// 进入或退出瞄准后的动作锁定时间
    pub post_scope_delay: f32,
}

impl WeaponConfig {
    pub fn new(clip_size: i32, reserve_size: i32) -> Self {
        Self {
            clip_size,
            reserve_size,
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, primary: FireParams) -> Self {
        self.primary = primary;
        self
    }

    pub fn with_secondary(mut self, secondary: FireParams) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn with_reload(mut self, mode: ReloadMode, reload_time: f32, warmup: f32) -> Self {
        self.reload_mode = mode;
        self.reload_time = reload_time;
        self.reload_warmup = warmup;
        self
    }

    pub fn with_reload_amount(mut self, reload_amount: i32) -> Self {
        self.reload_amount = reload_amount;
        self
    }

    pub fn with_post_reload_delay(mut self, delay: f32) -> Self {
        self.post_reload_delay = delay;
        self
    }

    pub fn with_energy_reload_delay(mut self, delay: f32) -> Self {
        self.energy_reload_delay = delay;
        self
    }

    pub fn with_scope(mut self, mode: ScopeMode, warmup: f32, cooldown: f32) -> Self {
        self.scope_mode = mode;
        self.scope_warmup = warmup;
        self.scope_cooldown = cooldown;
        self
    }

    pub fn with_post_scope_delay(mut self, delay: f32) -> Self {
        self.post_scope_delay = delay;
        self
    }

    pub fn channel(&self, channel: FireChannel) -> &FireParams {
        match channel {
            FireChannel::Primary => &self.primary,
            FireChannel::Secondary => &self.secondary,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            clip_size: 30,
            reserve_size: 90,
            primary: FireParams::default(),
            secondary: FireParams::semi_automatic(2.0),
            reload_mode: ReloadMode::FullClip,
            reload_time: 1.5,
            reload_warmup: 0.0,
            reload_amount: 1,
            post_reload_delay: 0.0,
            energy_reload_delay: 1.0,
            scope_mode: ScopeMode::Hold,
            scope_warmup: 0.2,
            scope_cooldown: 0.2,
            post_scope_delay: 0.0,
        }
    }
}
