use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::{CheckStore, Checker, CheckerConfiguration};
use crate::data::Data;
use crate::errors::TaskError;
use crate::format::DataFormat;
use crate::params::Parameters;
use crate::task::TaskStatus;

/// Orden de ejecución de los checkers (claves del mapa) según sus
/// dependencias. Las dependencias hacia claves ausentes deben filtrarse
/// antes. Un checker que se declara dependiente de sí mismo no forma ciclo:
/// esa dependencia se ignora.
///
/// Se siembra con los checkers sin dependencias y en cada pasada se añaden
/// los que ya tienen todas sus dependencias resueltas. Una pasada sin
/// progreso indica un ciclo.
pub fn resolve_checker_order(dependencies: &IndexMap<String, HashSet<String>>) -> Result<Vec<String>, TaskError> {
    let mut pending: IndexMap<&str, HashSet<&str>> =
        dependencies.iter()
                    .map(|(k, deps)| (k.as_str(), deps.iter().filter(|d| *d != k).map(String::as_str).collect()))
                    .collect();
    let mut added: IndexSet<&str> = IndexSet::new();

    for (checker, deps) in &pending {
        if deps.is_empty() {
            added.insert(*checker);
        }
    }
    pending.retain(|checker, _| !added.contains(checker));

    while !pending.is_empty() {
        let mut progress = false;
        let keys: Vec<&str> = pending.keys().copied().collect();
        for checker in keys {
            let Some(deps) = pending.get_mut(checker) else { continue };
            deps.retain(|d| !added.contains(d));
            if deps.is_empty() {
                pending.shift_remove(checker);
                added.insert(checker);
                progress = true;
            }
        }
        if !progress {
            let mut remaining: Vec<String> = pending.keys().map(|k| k.to_string()).collect();
            remaining.sort();
            return Err(TaskError::CheckerDependencies { pending: remaining });
        }
    }

    Ok(added.into_iter().map(str::to_string).collect())
}

struct Entry {
    checker: Box<dyn Checker>,
    data: Vec<Data>,
}

/// Ejecuta los checkers de los formatos recibidos en orden de dependencias.
pub struct CheckerCoordinator<'a> {
    step_id: String,
    configuration: &'a CheckerConfiguration,
    entries: IndexMap<String, Entry>,
}

impl<'a> CheckerCoordinator<'a> {
    pub fn new(step_id: &str, configuration: &'a CheckerConfiguration) -> Self {
        Self { step_id: step_id.to_string(), configuration, entries: IndexMap::new() }
    }

    /// Registra datos a validar. El checker del formato se crea y configura
    /// la primera vez.
    pub fn add_data(&mut self, format: &DataFormat, data: impl IntoIterator<Item = Data>) -> Result<(), TaskError> {
        if !self.entries.contains_key(format.name()) {
            let mut checker =
                format.checker().ok_or_else(|| TaskError::Format(format!("no checker for format {}", format.name())))?;
            let empty = Parameters::new();
            let parameters = self.configuration.get(format.name()).unwrap_or(&empty);
            checker.configure(&self.step_id, parameters)?;
            self.entries.insert(format.name().to_string(), Entry { checker, data: Vec::new() });
        }
        if let Some(entry) = self.entries.get_mut(format.name()) {
            entry.data.extend(data);
        }
        Ok(())
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> { self.entries.keys().map(String::as_str) }

    pub fn resolve_order(&self) -> Result<Vec<String>, TaskError> {
        let dependencies: IndexMap<String, HashSet<String>> =
            self.entries
                .iter()
                .map(|(format, entry)| {
                    let deps = entry.checker
                                    .checkers_required()
                                    .into_iter()
                                    .filter(|d| self.entries.contains_key(d))
                                    .collect();
                    (format.clone(), deps)
                })
                .collect();
        let order = resolve_checker_order(&dependencies)?;
        debug!("checker order for step {}: {:?}", self.step_id, order);
        Ok(order)
    }

    /// Valida todos los datos; el primer fallo aborta. Devuelve el número de
    /// datos validados.
    pub fn check_all(&self, status: &mut TaskStatus) -> Result<usize, TaskError> {
        let order = self.resolve_order()?;
        let total = self.entries.values().map(|e| e.data.len()).sum::<usize>();
        let mut store = CheckStore::new();
        let mut checked = 0;
        for format in &order {
            let Some(entry) = self.entries.get(format) else { continue };
            for data in &entry.data {
                debug!("{}: checking {} with {}", self.step_id, data.name(), entry.checker.name());
                entry.checker.check(data, &mut store)?;
                checked += 1;
                status.set_progress_range(0, total as i64, checked as i64);
            }
            status.increment_counter(&format!("checked {format}"), entry.data.len() as i64);
        }
        Ok(checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(entries: &[(&str, &[&str])]) -> IndexMap<String, HashSet<String>> {
        entries.iter()
               .map(|(k, ds)| (k.to_string(), ds.iter().map(|d| d.to_string()).collect()))
               .collect()
    }

    fn permutations(items: &[(&'static str, &'static [&'static str])]) -> Vec<Vec<(&'static str, &'static [&'static str])>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn chain_is_ordered_for_every_permutation() {
        let chain: [(&str, &[&str]); 3] = [("a", &[]), ("b", &["a"]), ("c", &["b"])];
        for perm in permutations(&chain) {
            let order = resolve_checker_order(&deps(&perm)).unwrap();
            assert_eq!(order, vec!["a", "b", "c"], "input order {perm:?}");
        }
    }

    #[test]
    fn diamond_respects_all_edges() {
        let order = resolve_checker_order(&deps(&[("d", &["b", "c"]), ("c", &["a"]), ("b", &["a"]), ("a", &[])])).unwrap();
        let pos = |k: &str| order.iter().position(|x| x == k).unwrap();
        assert!(pos("a") < pos("b") && pos("a") < pos("c"));
        assert!(pos("b") < pos("d") && pos("c") < pos("d"));
    }

    #[test]
    fn self_dependency_is_ignored() {
        let order = resolve_checker_order(&deps(&[("b", &["a", "b"]), ("a", &["a"])])).unwrap();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn cycle_is_rejected() {
        let err = resolve_checker_order(&deps(&[("a", &[]), ("b", &["c"]), ("c", &["b"])])).unwrap_err();
        match err {
            TaskError::CheckerDependencies { pending } => assert_eq!(pending, vec!["b", "c"]),
            other => panic!("unexpected error {other}"),
        }

        let err = resolve_checker_order(&deps(&[("x", &["y"]), ("y", &["x"])])).unwrap_err();
        assert!(err.to_string().starts_with("Unable to resolve checker dependencies"));
    }
}
