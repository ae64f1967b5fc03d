use crate::weapon::config::OverflowPolicy;

/// 弹药池
///
/// Clip and reserve counters. `0 <= clip <= clip_size` and `reserve >= 0`
/// hold whenever the respective pool is finite; an infinite pool is never
/// mutated and reports `-1` through [`AmmoPool::ammo`] and
/// [`AmmoPool::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoPool {
    clip: i32,
    reserve: i32,
    clip_size: i32,
    reserve_size: i32,
}

impl AmmoPool {
    /// 创建一个装满的弹药池
    pub fn new(clip_size: i32, reserve_size: i32) -> Self {
        let mut pool = Self {
            clip: 0,
            reserve: 0,
            clip_size,
            reserve_size,
        };
        pool.fill();
        pool
    }

    /// 以指定数量创建, 数量会被限制在合法范围内
    pub fn with_amounts(clip_size: i32, reserve_size: i32, clip: i32, reserve: i32) -> Self {
        let mut pool = Self::new(clip_size, reserve_size);
        pool.set(clip, reserve);
        pool
    }

    pub fn set(&mut self, clip: i32, reserve: i32) {
        if !self.is_infinite_clip() {
            self.clip = clip.clamp(0, self.clip_size);
        }
        if !self.is_infinite_reserve() {
            self.reserve = reserve.max(0);
        }
    }

    pub fn fill(&mut self) {
        self.clip = self.clip_size.max(0);
        self.reserve = self.reserve_size.max(0);
    }

    pub const fn is_infinite_clip(&self) -> bool {
        self.clip_size <= 0
    }

    pub const fn is_infinite_reserve(&self) -> bool {
        self.reserve_size < 0
    }

    /// 弹匣数量, 无限时为 -1
    pub const fn ammo(&self) -> i32 {
        if self.is_infinite_clip() {
            -1
        } else {
            self.clip
        }
    }

    /// 备弹数量, 无限时为 -1
    pub const fn reserve(&self) -> i32 {
        if self.is_infinite_reserve() {
            -1
        } else {
            self.reserve
        }
    }

    pub const fn clip_size(&self) -> i32 {
        self.clip_size
    }

    pub const fn reserve_size(&self) -> i32 {
        self.reserve_size
    }

    pub const fn clip_empty(&self) -> bool {
        !self.is_infinite_clip() && self.clip <= 0
    }

    pub const fn clip_full(&self) -> bool {
        self.is_infinite_clip() || self.clip >= self.clip_size
    }

    pub const fn reserve_empty(&self) -> bool {
        !self.is_infinite_reserve() && self.reserve <= 0
    }

    /// 弹匣未满且还有备弹
    pub const fn can_reload(&self) -> bool {
        !self.clip_full() && !self.reserve_empty()
    }

    /// 按溢出策略消耗弹药, 返回是否成功
    ///
    /// Consume `cost` from the clip. When the clip is short, `policy` decides
    /// whether the shortfall is ignored, taken from the reserve, or rejects
    /// the whole operation without touching the pool.
    pub fn consume(&mut self, cost: i32, policy: OverflowPolicy) -> bool {
        if self.is_infinite_clip() || cost <= 0 {
            return true;
        }
        if self.clip >= cost {
            self.clip -= cost;
            return true;
        }

        let shortfall = cost - self.clip;
        match policy {
            OverflowPolicy::IgnoreOverflow => {
                self.clip = 0;
                true
            }
            OverflowPolicy::FillFromReserve => {
                self.clip = 0;
                self.take_reserve(shortfall);
                true
            }
            OverflowPolicy::Disable => false,
            OverflowPolicy::DisableReserveOnly => {
                if self.is_infinite_reserve() || self.reserve > shortfall {
                    self.clip = 0;
                    self.take_reserve(shortfall);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn take_reserve(&mut self, amount: i32) {
        if !self.is_infinite_reserve() {
            self.reserve = (self.reserve - amount).max(0);
        }
    }

    /// 从备弹向弹匣装填至多 `amount` 发, 返回实际装填数量
    pub fn refill(&mut self, amount: i32) -> i32 {
        if self.is_infinite_clip() || amount <= 0 {
            return 0;
        }
        let mut moved = amount.min(self.clip_size - self.clip).max(0);
        if !self.is_infinite_reserve() {
            moved = moved.min(self.reserve);
            self.reserve -= moved;
        }
        self.clip += moved;
        moved
    }

    /// 把弹匣中的弹药退回备弹
    pub fn dump_clip(&mut self) {
        if self.is_infinite_clip() {
            return;
        }
        if !self.is_infinite_reserve() {
            self.reserve += self.clip;
        }
        self.clip = 0;
    }

    /// 拾取弹药, 备弹最多补到 `reserve_size`, 返回实际增加的数量
    pub fn replenish(&mut self, amount: i32) -> i32 {
        if self.is_infinite_reserve() || amount <= 0 {
            return 0;
        }
        let cap = self.reserve_size.max(self.reserve);
        let added = amount.min(cap - self.reserve);
        self.reserve += added;
        added
    }
}
