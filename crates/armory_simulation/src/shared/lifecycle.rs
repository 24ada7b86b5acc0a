//! Двухфазный lifecycle in-flight сущностей (пули, взрывы)
//!
//! Каждый `advance(now, dt)` возвращает Lifecycle; manager оставляет
//! `Active` и выбрасывает `Terminal` в одном filter-проходе за tick.
//! Terminal может нести payload (например explosion request у пули).

/// Результат одного шага сущности
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifecycle<T = ()> {
    /// Живёт дальше, вернётся в active set
    Active,
    /// Завершилась на этом tick (payload = что она оставила после себя)
    Terminal(T),
}

impl<T> Lifecycle<T> {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_flags() {
        let active: Lifecycle = Lifecycle::Active;
        assert!(active.is_active());
        assert!(!active.is_terminal());

        let done: Lifecycle<u32> = Lifecycle::Terminal(7);
        assert!(done.is_terminal());
        assert_eq!(done, Lifecycle::Terminal(7));
    }
}
