use smallvec::SmallVec;

use crate::weapon::config::FireChannel;

/// 武器在一帧中产生的事件
///
/// Events produced by [`Weapon::update`](crate::weapon::Weapon::update), in the
/// order they happened during the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponEvent {
    /// 自动或半自动射击
    Fired { channel: FireChannel },
    /// 蓄力射击, `pct_time` 为蓄力程度, `pct_ammo` 为实际支付的弹药比例
    ChargedFire {
        channel: FireChannel,
        pct_time: f32,
        pct_ammo: f32,
    },
    ScopeStarted,
    ScopeStopped,
    ReloadStarted,
    /// 一次装填完成(整匣或逐发)
    ReloadOccurred,
    ReloadStopped,
    /// 本帧弹药发生变化, -1 表示无限
    AmmoChanged { ammo: i32, reserve: i32 },
}

pub type WeaponEvents = SmallVec<[WeaponEvent; 4]>;
