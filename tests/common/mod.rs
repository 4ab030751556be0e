//! # Specsuite Test Harness
//!
//! Stand-ins for the ambient collaborators: a script host that records what
//! it was asked to compile, and a framework that records registrations and
//! can run the registered cases against explicit test contexts.

#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use specsuite::{Callable, CaseFailure, Framework, ScriptHost, TestContext};

// ============================================================================
// SCRIPT HOST
// ============================================================================

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HostFailure(pub String);

/// Records compiled programs. Rejects programs whose brackets do not
/// balance, which is enough to stand in for a syntax check.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub compiled: Vec<String>,
    pub invocations: usize,
    pub fail_invoke: bool,
}

impl ScriptHost for RecordingHost {
    /// The ambient scope collects every program invoked against it.
    type Scope = Vec<String>;
    type Unit = String;
    type Error = HostFailure;

    fn compile(&mut self, program: &str) -> Result<String, HostFailure> {
        if !balanced(program) {
            return Err(HostFailure(format!("unbalanced program: {program}")));
        }
        self.compiled.push(program.to_string());
        Ok(program.to_string())
    }

    fn invoke(&mut self, unit: String, scope: &mut Vec<String>) -> Result<(), HostFailure> {
        self.invocations += 1;
        if self.fail_invoke {
            return Err(HostFailure("describe is not defined".to_string()));
        }
        scope.push(unit);
        Ok(())
    }
}

fn balanced(program: &str) -> bool {
    let mut stack = Vec::new();
    let mut quoted = false;
    let mut escaped = false;
    for c in program.chars() {
        if quoted {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '\'') => quoted = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => quoted = true,
            '(' | '{' | '[' => stack.push(c),
            ')' | '}' | ']' => {
                let open = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                if stack.pop() != Some(open) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && !quoted
}

// ============================================================================
// FRAMEWORK
// ============================================================================

/// One registered suite.
#[derive(Debug, Default, Clone)]
pub struct SuiteRecord {
    pub name: String,
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
    pub before: Vec<Callable>,
    pub after: Vec<Callable>,
    pub cases: Vec<(String, Callable)>,
    pub suites: Vec<SuiteRecord>,
}

/// Records registrations as a flat event log and as a suite tree.
#[derive(Debug, Default)]
pub struct RecordingFramework {
    pub events: Vec<String>,
    pub root: SuiteRecord,
    stack: Vec<SuiteRecord>,
}

impl RecordingFramework {
    fn current(&mut self) -> &mut SuiteRecord {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    /// Runs every registered case. Dependencies are resolved by name from
    /// `injector`; modules loaded along the way are bound as `module:<name>`.
    pub fn run_all(
        &self,
        injector: &HashMap<String, Arc<dyn Any + Send + Sync>>,
    ) -> Vec<(String, Result<(), CaseFailure>)> {
        let mut results = Vec::new();
        run_suite(&self.root, &[], injector, &mut Vec::new(), &mut results);
        results
    }
}

fn run_suite<'a>(
    suite: &'a SuiteRecord,
    path: &[String],
    injector: &HashMap<String, Arc<dyn Any + Send + Sync>>,
    chain: &mut Vec<&'a SuiteRecord>,
    results: &mut Vec<(String, Result<(), CaseFailure>)>,
) {
    chain.push(suite);
    let mut path = path.to_vec();
    if !suite.name.is_empty() {
        path.push(suite.name.clone());
    }
    for (name, body) in &suite.cases {
        let mut full = path.clone();
        full.push(name.clone());
        results.push((full.join(" "), run_case(chain, body, injector)));
    }
    for nested in &suite.suites {
        run_suite(nested, &path, injector, chain, results);
    }
    chain.pop();
}

fn run_case(
    chain: &[&SuiteRecord],
    body: &Callable,
    injector: &HashMap<String, Arc<dyn Any + Send + Sync>>,
) -> Result<(), CaseFailure> {
    let mut ctx = TestContext::new();
    for suite in chain {
        for module in &suite.modules {
            ctx.bind(format!("module:{module}"), true);
        }
        for dep in &suite.dependencies {
            let value = injector
                .get(dep)
                .ok_or_else(|| CaseFailure::Unbound(dep.clone()))?;
            ctx.bind_shared(dep.clone(), Arc::clone(value));
        }
        for hook in &suite.before {
            hook.invoke(&mut ctx)?;
        }
    }
    let outcome = body.invoke(&mut ctx);
    for suite in chain.iter().rev() {
        for hook in &suite.after {
            hook.invoke(&mut ctx)?;
        }
    }
    outcome
}

impl Framework for RecordingFramework {
    fn describe(&mut self, name: &str) {
        self.events.push(format!("describe {name}"));
        self.stack.push(SuiteRecord {
            name: name.to_string(),
            ..SuiteRecord::default()
        });
    }

    fn end_describe(&mut self, name: &str) {
        self.events.push(format!("end {name}"));
        if let Some(done) = self.stack.pop() {
            self.current().suites.push(done);
        }
    }

    fn describe_with(&mut self, name: &str, body: &Callable) {
        self.events.push(format!("describe {name} {}", body.source()));
    }

    fn it(&mut self, name: &str, body: &Callable) {
        self.events.push(format!("it {name}"));
        self.current().cases.push((name.to_string(), body.clone()));
    }

    fn load_modules(&mut self, modules: &[String]) {
        self.events.push(format!("modules {}", modules.join(",")));
        self.current().modules.extend(modules.iter().cloned());
    }

    fn inject(&mut self, dependencies: &[String]) {
        self.events.push(format!("inject {}", dependencies.join(",")));
        self.current().dependencies.extend(dependencies.iter().cloned());
    }

    fn before_each(&mut self, hook: &Callable) {
        self.events.push(format!("before {}", hook.source()));
        self.current().before.push(hook.clone());
    }

    fn after_each(&mut self, hook: &Callable) {
        self.events.push(format!("after {}", hook.source()));
        self.current().after.push(hook.clone());
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn noop(source: &str) -> Callable {
    Callable::new(source).with_body(|_| Ok(()))
}
