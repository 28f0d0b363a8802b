// screen-lens/src/dispatcher.rs

// ============================================================================
// MÓDULO DISPATCHER - Trabalho em background, resultado na thread da UI
// ============================================================================
//
// Único ponto de sincronização entre threads da aplicação:
//
//   thread de trabalho ──(crossbeam channel)──▶ UiQueue::drain (thread da UI)
//
// - `UiQueue`: lado da UI. Não é `Send`; guarda a thread dona e só ela drena.
// - `UiHandle`: lado das outras threads. Clonável, `Send`, só envia tarefas.
//
// Nenhuma thread de trabalho toca no estado da UI diretamente: tudo que muda
// estado visível chega como tarefa na fila e roda dentro do `drain`.
//
// ============================================================================

use anyhow::anyhow;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

/// Tarefa executada na thread da UI com acesso exclusivo ao estado `S`
pub type UiTask<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

type Waker = Box<dyn Fn() + Send + Sync + 'static>;

// ============================================================================
// LADO DA UI
// ============================================================================

/// Fila de tarefas da thread da UI
pub struct UiQueue<S> {
    sender: Sender<UiTask<S>>,
    receiver: Receiver<UiTask<S>>,
    owner: ThreadId,
    /// Acorda o loop da UI quando chega tarefa nova (ex: `request_repaint`)
    waker: Arc<OnceLock<Waker>>,
    /// `*const ()` tira o `Send`/`Sync`: a fila nunca sai da thread dona
    _not_send: PhantomData<*const ()>,
}

impl<S> UiQueue<S> {
    /// Cria a fila; a thread atual passa a ser a dona da UI
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        UiQueue {
            sender,
            receiver,
            owner: thread::current().id(),
            waker: Arc::new(OnceLock::new()),
            _not_send: PhantomData,
        }
    }

    /// Handle para enviar tarefas de qualquer thread
    pub fn handle(&self) -> UiHandle<S> {
        UiHandle {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Registra o callback que acorda o loop de eventos (só o primeiro vale)
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        if self.waker.set(Box::new(waker)).is_err() {
            warn!("⚠️  Waker da UI já registrado, ignorando");
        }
    }

    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Executa, em ordem de chegada, todas as tarefas pendentes
    ///
    /// Retorna quantas tarefas rodaram. Fora da thread dona não executa nada.
    pub fn drain(&self, state: &mut S) -> usize {
        if !self.is_owner_thread() {
            error!("❌ UiQueue::drain chamado fora da thread da UI, ignorando");
            return 0;
        }

        let mut executed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(state);
            executed += 1;
        }
        executed
    }

    /// Espera tarefas até `done(state)` ser verdadeiro ou o tempo acabar
    #[cfg(test)]
    pub fn drain_until(
        &self,
        state: &mut S,
        timeout: std::time::Duration,
        done: impl Fn(&S) -> bool,
    ) -> bool {
        let deadline = std::time::Instant::now() + timeout;

        loop {
            self.drain(state);
            if done(state) {
                return true;
            }

            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return false;
            }

            if let Ok(task) = self.receiver.recv_timeout(remaining) {
                task(state);
            }
        }
    }
}

impl<S> Default for UiQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// LADO DAS THREADS DE TRABALHO
// ============================================================================

/// Handle `Send + Clone` para postar tarefas na thread da UI
pub struct UiHandle<S> {
    sender: Sender<UiTask<S>>,
    waker: Arc<OnceLock<Waker>>,
}

impl<S> Clone for UiHandle<S> {
    fn clone(&self) -> Self {
        UiHandle {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<S: 'static> UiHandle<S> {
    /// Posta uma tarefa para a thread da UI
    ///
    /// Retorna false se a UI já foi encerrada (a tarefa é descartada).
    pub fn post(&self, task: impl FnOnce(&mut S) + Send + 'static) -> bool {
        if self.sender.send(Box::new(task)).is_err() {
            debug!("📭 UI encerrada, tarefa descartada");
            return false;
        }

        if let Some(wake) = self.waker.get() {
            wake();
        }
        true
    }

    /// Roda `work` numa thread nova e entrega o resultado em `on_done`,
    /// sempre na thread da UI e exatamente uma vez
    ///
    /// Panics em `work` chegam como `Err` em `on_done`.
    pub fn run<R, W, D>(&self, label: &str, work: W, on_done: D)
    where
        R: Send + 'static,
        W: FnOnce() -> anyhow::Result<R> + Send + 'static,
        D: FnOnce(&mut S, anyhow::Result<R>) + Send + 'static,
    {
        let handle = self.clone();
        let label = label.to_string();

        // on_done vai para a thread e volta dentro da tarefa; se o spawn
        // falhar, ele fica aqui para entregar o erro
        let on_done_slot = Arc::new(std::sync::Mutex::new(Some(on_done)));
        let worker_slot = on_done_slot.clone();
        let worker_label = label.clone();

        let spawned = thread::Builder::new()
            .name(format!("worker-{}", label))
            .spawn(move || {
                let result = match panic::catch_unwind(AssertUnwindSafe(work)) {
                    Ok(result) => result,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!("💥 Thread '{}' entrou em pânico: {}", worker_label, message);
                        Err(anyhow!("tarefa '{}' falhou: {}", worker_label, message))
                    }
                };

                let on_done = worker_slot
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .take();
                if let Some(on_done) = on_done {
                    handle.post(move |state: &mut S| on_done(state, result));
                }
            });

        if let Err(e) = spawned {
            error!("❌ Falha ao criar thread '{}': {}", label, e);
            let on_done = on_done_slot
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .take();
            if let Some(on_done) = on_done {
                let err = anyhow!("falha ao criar thread '{}': {}", label, e);
                self.post(move |state: &mut S| on_done(state, Err(err)));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "pânico sem mensagem".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Probe {
        results: Vec<Result<u32, String>>,
        threads: Vec<ThreadId>,
    }

    #[test]
    fn completion_runs_on_the_ui_thread_even_when_started_elsewhere() {
        let queue = UiQueue::<Probe>::new();
        let handle = queue.handle();

        // Dispara a partir de outra thread (como a thread de hotkeys faria)
        thread::spawn(move || {
            handle.run(
                "probe",
                || Ok(7),
                |probe: &mut Probe, result| {
                    probe.threads.push(thread::current().id());
                    probe.results.push(result.map_err(|e| e.to_string()));
                },
            );
        })
        .join()
        .unwrap();

        let mut probe = Probe::default();
        assert!(queue.drain_until(&mut probe, Duration::from_secs(5), |p| !p.results.is_empty()));

        assert_eq!(probe.results, vec![Ok(7)]);
        assert_eq!(probe.threads, vec![thread::current().id()]);
    }

    #[test]
    fn errors_and_panics_are_delivered_to_the_ui() {
        let queue = UiQueue::<Probe>::new();
        let handle = queue.handle();

        handle.run(
            "falha",
            || -> anyhow::Result<u32> { anyhow::bail!("ocr quebrou") },
            |probe: &mut Probe, result| probe.results.push(result.map_err(|e| e.to_string())),
        );
        handle.run(
            "panico",
            || -> anyhow::Result<u32> { panic!("boom") },
            |probe: &mut Probe, result| probe.results.push(result.map_err(|e| e.to_string())),
        );

        let mut probe = Probe::default();
        assert!(queue.drain_until(&mut probe, Duration::from_secs(5), |p| p.results.len() == 2));

        assert!(probe.results.iter().all(|r| r.is_err()));
        assert!(probe
            .results
            .iter()
            .any(|r| r.as_ref().unwrap_err().contains("ocr quebrou")));
        assert!(probe
            .results
            .iter()
            .any(|r| r.as_ref().unwrap_err().contains("boom")));
    }

    #[test]
    fn posted_tasks_run_in_arrival_order() {
        let queue = UiQueue::<Vec<u32>>::new();
        let handle = queue.handle();

        for i in 0..5 {
            handle.post(move |items: &mut Vec<u32>| items.push(i));
        }

        let mut items = Vec::new();
        assert_eq!(queue.drain(&mut items), 5);
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn waker_is_called_for_each_post() {
        let queue = UiQueue::<u32>::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        queue.set_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handle = queue.handle();
        handle.post(|n: &mut u32| *n += 1);
        handle.post(|n: &mut u32| *n += 1);

        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn post_after_ui_shutdown_is_discarded() {
        let queue = UiQueue::<u32>::new();
        let handle = queue.handle();
        drop(queue);

        assert!(!handle.post(|n: &mut u32| *n += 1));
    }
}
