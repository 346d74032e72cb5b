//! # Límite de conexiones simultáneas
//! src/server/limiter.rs
//!
//! Contador compartido entre el accept loop y los threads de conexión. El
//! accept loop pide un permiso antes de lanzar el thread; si el límite está
//! alcanzado no espera, la conexión se cierra. El permiso se libera cuando
//! el thread termina (al hacer drop).

use std::sync::{Arc, Mutex};

/// Contador de conexiones compartido entre el accept loop y los threads
#[derive(Clone)]
pub struct ConnectionLimiter {
    active: Arc<Mutex<usize>>,
    max: usize,
}

/// Permiso de una conexión; libera su lugar al hacer drop
pub struct ConnectionPermit {
    active: Arc<Mutex<usize>>,
}

impl ConnectionLimiter {
    /// `max` se lleva a 1 como mínimo
    pub fn new(max: usize) -> Self {
        Self {
            active: Arc::new(Mutex::new(0)),
            max: max.max(1),
        }
    }

    /// Toma un permiso sin bloquear; `None` si el límite está alcanzado
    pub fn try_acquire(&self) -> Option<ConnectionPermit> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if *active >= self.max {
            return None;
        }
        *active += 1;

        Some(ConnectionPermit {
            active: Arc::clone(&self.active),
        })
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *active = active.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn active(limiter: &ConnectionLimiter) -> usize {
        *limiter.active.lock().unwrap()
    }

    #[test]
    fn test_permits_are_counted() {
        let limiter = ConnectionLimiter::new(2);

        let first = limiter.try_acquire().unwrap();
        let _second = limiter.try_acquire().unwrap();
        assert_eq!(active(&limiter), 2);
        assert!(limiter.try_acquire().is_none());

        drop(first);
        assert_eq!(active(&limiter), 1);
        assert!(limiter.try_acquire().is_some());
    }

    #[test]
    fn test_zero_max_is_clamped() {
        let limiter = ConnectionLimiter::new(0);

        let permit = limiter.try_acquire();
        assert!(permit.is_some());
        assert!(limiter.try_acquire().is_none());
    }

    #[test]
    fn test_permit_released_from_other_thread() {
        let limiter = ConnectionLimiter::new(1);
        let permit = limiter.try_acquire().unwrap();

        thread::spawn(move || drop(permit)).join().unwrap();

        assert_eq!(active(&limiter), 0);
        assert!(limiter.try_acquire().is_some());
    }
}
