use crate::error::{Error, Result};
use crate::host::Host;
use crate::spawn::{self, SpawnRequest, Spawned};
use log::{debug, warn};
use std::any::TypeId;

/// A strategy that knows how to open some kind of resource on some kind of
/// host.
///
/// `handles` should be cheap and free of side effects, apart from looking
/// at the host (desktop detection, executable lookups). `launch` is only
/// called after `handles` said yes for the same arguments.
pub trait LauncherHandler {
    fn name(&self) -> &'static str;

    fn handles(&self, host: &Host, args: &[String]) -> bool;

    fn launch(&self, host: &Host, args: &[String]) -> SpawnRequest;
}

/// Handlers in the order they were registered. Earlier handlers win.
#[derive(Default)]
pub struct Registry {
    handlers: Vec<(TypeId, Box<dyn LauncherHandler>)>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Append a handler. Each handler type goes in once; registering the
    /// same type again is ignored and returns `false`.
    pub fn register<H: LauncherHandler + 'static>(&mut self, handler: H) -> bool {
        let id = TypeId::of::<H>();
        if self.handlers.iter().any(|(registered, _)| *registered == id) {
            warn!("launcher {} is already registered", handler.name());
            return false;
        }
        debug!("registered launcher {}", handler.name());
        self.handlers.push((id, Box::new(handler)));
        true
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|h| h.name()).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &(dyn LauncherHandler + 'static)> {
        self.handlers.iter().map(|(_, h)| h.as_ref())
    }
}

/// A handler that accepted a request, and the command it wants run.
#[derive(Debug)]
pub struct Prepared {
    pub handler: &'static str,
    pub request: SpawnRequest,
}

/// Picks the first registered handler that accepts a request.
pub struct Dispatcher {
    registry: Registry,
    host: Host,
}

impl Dispatcher {
    pub fn new(registry: Registry, host: Host) -> Dispatcher {
        Dispatcher { registry, host }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// `None` means nothing on this host can open `args`; that is an
    /// answer, not a failure.
    pub fn find_handler_for(&self, args: &[String]) -> Option<&dyn LauncherHandler> {
        debug!("finding launcher for [{}]", args.join(" "));
        let found = self.registry.iter().find(|h| h.handles(&self.host, args));
        match found {
            Some(handler) => debug!("  => {}", handler.name()),
            None => debug!("  => no launcher"),
        }
        found
    }

    pub fn prepare(&self, args: &[String]) -> Result<Prepared> {
        let handler = self
            .find_handler_for(args)
            .ok_or_else(|| Error::NoHandler(args.to_vec()))?;
        Ok(Prepared {
            handler: handler.name(),
            request: handler.launch(&self.host, args),
        })
    }

    /// Dispatch and spawn. Spawn failures are returned as-is; we don't go
    /// looking for another handler.
    pub fn open(&self, args: &[String]) -> Result<Spawned> {
        let prepared = self.prepare(args)?;
        spawn::spawn(&prepared.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::OsFamily;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    // Accepts anything whose first argument starts with its prefix, and
    // counts how often it was asked.
    macro_rules! prefix_handler {
        ($name:ident) => {
            struct $name {
                prefix: &'static str,
                asked: Rc<Cell<usize>>,
            }

            impl LauncherHandler for $name {
                fn name(&self) -> &'static str {
                    stringify!($name)
                }

                fn handles(&self, _host: &Host, args: &[String]) -> bool {
                    self.asked.set(self.asked.get() + 1);
                    args.first().is_some_and(|a| a.starts_with(self.prefix))
                }

                fn launch(&self, host: &Host, args: &[String]) -> SpawnRequest {
                    SpawnRequest::new(host.family(), stringify!($name), args.to_vec())
                }
            }
        };
    }

    prefix_handler!(H1);
    prefix_handler!(H2);
    prefix_handler!(H3);

    fn host() -> Host {
        Host::new("linux", HashMap::new())
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn counter() -> Rc<Cell<usize>> {
        Rc::new(Cell::new(0))
    }

    fn three(asked: &[Rc<Cell<usize>>; 3]) -> Registry {
        let mut registry = Registry::new();
        registry.register(H1 { prefix: "x", asked: asked[0].clone() });
        registry.register(H2 { prefix: "y", asked: asked[1].clone() });
        registry.register(H3 { prefix: "x", asked: asked[2].clone() });
        registry
    }

    #[test]
    fn first_registered_match_wins() {
        let asked = [counter(), counter(), counter()];
        let dispatcher = Dispatcher::new(three(&asked), host());

        for _ in 0..3 {
            let handler = dispatcher.find_handler_for(&args(&["xyz"]));
            assert_eq!(handler.map(|h| h.name()), Some("H1"));
        }
        // Nothing after the winner is consulted.
        assert_eq!(asked[1].get(), 0);
        assert_eq!(asked[2].get(), 0);
    }

    #[test]
    fn later_handler_when_earlier_declines() {
        let asked = [counter(), counter(), counter()];
        let dispatcher = Dispatcher::new(three(&asked), host());

        let handler = dispatcher.find_handler_for(&args(&["yes"]));
        assert_eq!(handler.map(|h| h.name()), Some("H2"));
        assert_eq!(asked[0].get(), 1);
        assert_eq!(asked[2].get(), 0);
    }

    #[test]
    fn no_match_is_none() {
        let asked = [counter(), counter(), counter()];
        let dispatcher = Dispatcher::new(three(&asked), host());

        assert!(dispatcher.find_handler_for(&args(&["zzz"])).is_none());
        assert!(dispatcher.find_handler_for(&[]).is_none());
        assert_eq!(asked.iter().map(|a| a.get()).sum::<usize>(), 6);
    }

    #[test]
    fn empty_registry_never_matches() {
        let dispatcher = Dispatcher::new(Registry::new(), host());
        assert!(dispatcher.find_handler_for(&args(&["x"])).is_none());
    }

    #[test]
    fn register_each_type_once() {
        let mut registry = Registry::new();
        assert!(registry.register(H1 { prefix: "a", asked: counter() }));
        assert!(registry.register(H2 { prefix: "b", asked: counter() }));
        assert!(!registry.register(H1 { prefix: "c", asked: counter() }));
        assert_eq!(registry.names(), vec!["H1", "H2"]);
    }

    #[test]
    fn prepare_builds_the_winners_request() {
        let asked = [counter(), counter(), counter()];
        let dispatcher = Dispatcher::new(three(&asked), host());

        let prepared = dispatcher.prepare(&args(&["x1", "x2"])).expect("Expected a handler");
        assert_eq!(prepared.handler, "H1");
        assert_eq!(
            prepared.request,
            SpawnRequest::new(OsFamily::Nix, "H1", ["x1", "x2"])
        );
    }

    #[test]
    fn prepare_without_handler_is_no_handler() {
        let asked = [counter(), counter(), counter()];
        let dispatcher = Dispatcher::new(three(&asked), host());

        assert_matches!(
            dispatcher.prepare(&args(&["zzz"])),
            Err(Error::NoHandler(a)) if a == vec!["zzz".to_string()]
        );
        assert_matches!(
            dispatcher.open(&args(&["zzz"])),
            Err(Error::NoHandler(_))
        );
    }

    #[test]
    fn open_reports_spawn_failure() {
        let mut registry = Registry::new();
        registry.register(H1 { prefix: "", asked: counter() });
        // "H1" is not a program anyone has installed.
        let dispatcher = Dispatcher::new(registry, Host::new("mswin", HashMap::new()));

        assert_matches!(
            dispatcher.open(&args(&["anything"])),
            Err(Error::Spawn { .. })
        );
    }
}
