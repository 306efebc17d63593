use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Señales que emite la cuenta atrás al sondearla.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Ha pasado un segundo entero; lleva el nuevo valor restante
    /// (incluida la transición a 0).
    Tick(u32),
    /// El tiempo ha llegado a 0. Se emite exactamente una vez y después
    /// el temporizador queda parado.
    Expired,
}

struct Running {
    remaining: u32,
    last_tick: Instant,
}

/// Cuenta atrás de granularidad de un segundo, propiedad exclusiva de la
/// pantalla de quiz. No hay ningún callback ambiente: el hilo de UI la
/// sondea cada frame con `poll` y aplica los eventos que devuelva. Parar
/// (o soltar) el valor garantiza que no vuelve a disparar.
#[derive(Default)]
pub struct CountdownTimer {
    inner: Option<Running>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arma la cuenta atrás. Si ya había una en marcha, la sustituye: como
    /// máximo existe una cuenta viva por instancia. Con `initial_seconds`
    /// igual a 0 queda armada en 0 y el siguiente `poll` emite `Expired`.
    pub fn start(&mut self, initial_seconds: u32, now: Instant) {
        self.inner = Some(Running {
            remaining: initial_seconds,
            last_tick: now,
        });
    }

    /// Desarma la cuenta atrás; tras esto nunca vuelve a emitir eventos.
    pub fn stop(&mut self) {
        self.inner = None;
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.inner.as_ref().map(|r| r.remaining)
    }

    /// Avanza la cuenta según el reloj: un `Tick` por cada segundo entero
    /// transcurrido desde el último, y `Expired` (una sola vez) al llegar a
    /// 0, momento en el que el temporizador se desarma solo.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        let Some(mut run) = self.inner.take() else {
            return events;
        };

        if run.remaining == 0 {
            // Arrancada con duración 0: expira sin ticks.
            events.push(TimerEvent::Expired);
            return events;
        }

        while now.duration_since(run.last_tick) >= TICK {
            run.last_tick += TICK;
            run.remaining -= 1;
            events.push(TimerEvent::Tick(run.remaining));
            if run.remaining == 0 {
                events.push(TimerEvent::Expired);
                return events;
            }
        }

        self.inner = Some(run);
        events
    }
}

/// Formato `mm:ss` derivado del valor restante; no se almacena.
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segundos(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn emite_un_tick_por_segundo_y_expira_una_vez() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.start(3, t0);

        let mut ticks = Vec::new();
        let mut expirations = 0;
        for s in 1..=10u64 {
            for ev in timer.poll(t0 + segundos(s)) {
                match ev {
                    TimerEvent::Tick(r) => ticks.push(r),
                    TimerEvent::Expired => expirations += 1,
                }
            }
        }

        assert_eq!(ticks, vec![2, 1, 0]);
        assert_eq!(expirations, 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn varios_segundos_atrasados_se_recuperan_en_un_solo_poll() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.start(5, t0);

        let events = timer.poll(t0 + segundos(3));
        assert_eq!(
            events,
            vec![
                TimerEvent::Tick(4),
                TimerEvent::Tick(3),
                TimerEvent::Tick(2)
            ]
        );
        assert_eq!(timer.remaining(), Some(2));
    }

    #[test]
    fn duracion_cero_expira_sin_ticks() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.start(0, t0);

        assert_eq!(timer.poll(t0), vec![TimerEvent::Expired]);
        assert!(timer.poll(t0 + segundos(5)).is_empty());
    }

    #[test]
    fn parar_impide_cualquier_evento_posterior() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.start(10, t0);
        timer.stop();

        assert!(timer.poll(t0 + segundos(30)).is_empty());
        assert!(!timer.is_running());
    }

    #[test]
    fn rearmar_sustituye_la_cuenta_anterior() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.start(100, t0);
        timer.start(2, t0);

        let events = timer.poll(t0 + segundos(2));
        assert_eq!(
            events,
            vec![
                TimerEvent::Tick(1),
                TimerEvent::Tick(0),
                TimerEvent::Expired
            ]
        );
    }

    #[test]
    fn formato_mm_ss_con_ceros() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(605), "10:05");
        assert_eq!(format_mm_ss(3600), "60:00");
    }
}
