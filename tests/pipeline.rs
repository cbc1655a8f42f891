use std::fs;
use std::io::Write;

use seqflow_rust::adapters::formats::READS_FASTQ;
use seqflow_rust::*;
use tempfile::tempdir;

/// Escribe `samples` pares de FASTQ de `reads` lecturas; las `corrupt`
/// primeras muestras llevan una calidad truncada en el segundo fichero.
#[derive(Default)]
struct ReadsImporter {
    samples: usize,
    reads: usize,
    corrupt: usize,
    outputs: OutputPorts,
}

fn record(sample: usize, mate: usize, i: usize, quality: &str) -> String {
    format!("@s{sample}.{i}/{mate}\nACGTA\n+\n{quality}\n")
}

impl Module for ReadsImporter {
    fn name(&self) -> &str { "readsimporter" }

    fn version(&self) -> Version { Version::parse("0.2") }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        let int = |name: &str, min: i32, default: usize| -> Result<usize, ConfigurationError> {
            match parameters.get(name) {
                Some(p) => Ok(p.int_value_greater_or_equals_to(min).map_err(|e| e.in_step(context.step_id))? as usize),
                None => Ok(default),
            }
        };
        self.samples = int("samples", 1, 2)?;
        self.reads = int("reads", 1, 5)?;
        self.corrupt = int("corrupt", 0, 0)?;
        let format = context.formats.by_name(READS_FASTQ).ok_or_else(|| ConfigurationError::UnknownFormat(READS_FASTQ.into()))?;
        self.outputs = OutputPorts::single(OutputPort::new("output", format)?.with_list(true));
        Ok(())
    }

    fn output_ports(&self) -> OutputPorts { self.outputs.clone() }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        for s in 1..=self.samples {
            for mate in 0..2 {
                let file = match context.output_data("output", &format!("s{s}")).and_then(|d| d.data_file_at(mate)) {
                    Ok(file) => file,
                    Err(e) => return status.create_task_result_with_error(e),
                };
                let written = file.create().and_then(|mut w| {
                                              for i in 0..self.reads {
                                                  let broken = s <= self.corrupt && mate == 1 && i == self.reads - 1;
                                                  w.write_all(record(s, mate, i, if broken { "III" } else { "IIIII" }).as_bytes())?;
                                              }
                                              w.flush()
                                          });
                if let Err(e) = written {
                    return status.create_task_result_with_error(e.into());
                }
            }
        }
        status.create_task_result()
    }
}

fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs.iter().map(|(k, v)| Parameter::new(k, *v).unwrap()).collect()
}

fn build(config: &EngineConfig, modules: &ModuleRegistry, formats: &DataFormatRegistry, corrupt: &str) -> Workflow {
    let checker = CheckerConfiguration::new().with("reads", Parameters::new());
    let mut builder = WorkflowBuilder::new(modules, formats, config).checker_configuration(checker);
    builder.add_step(StepSpec::new("import", "readsimporter").with_type(StepType::Generator)
                                                            .with_parameters(params(&[("corrupt", corrupt)])))
           .unwrap()
           .add_step(StepSpec::new("split", "splitter").with_parameters(params(&[("format", "reads"), ("max.entries", "2")])))
           .unwrap()
           .add_step(StepSpec::new("merge", "merger").with_parameters(params(&[("format", "reads")])))
           .unwrap()
           .add_step(StepSpec::new("check", "checker").with_type(StepType::Checker))
           .unwrap();
    builder.link("import", "output", "split", "input")
           .unwrap()
           .link("split", "output", "merge", "input")
           .unwrap()
           .link("merge", "output", "check", "readsfastq")
           .unwrap();
    builder.build().unwrap()
}

fn registries() -> (ModuleRegistry, DataFormatRegistry) {
    let modules = builtin_modules();
    modules.register(ModuleDescriptor::new("readsimporter", Version::parse("0.2"), || Box::new(ReadsImporter::default())));
    (modules, builtin_formats().unwrap())
}

#[test]
fn paired_reads_survive_split_merge_and_check() {
    let dir = tempdir().unwrap();
    let config = EngineConfig { working_directory: dir.path().to_path_buf(), local_threads: 2, ..EngineConfig::default() };
    let (modules, formats) = registries();
    let mut workflow = build(&config, &modules, &formats, "0");
    assert_eq!(workflow.step_ids(), vec!["import", "split", "merge", "check"]);

    let results = LocalRunner::new(&config).unwrap().run(&mut workflow).unwrap();
    assert!(results.iter().all(StepResult::is_success), "{:?}", results.iter().map(StepResult::to_json).collect::<Vec<_>>());

    // 5 lecturas de 2 en 2 -> 3 partes por muestra
    assert!(dir.path().join("split_output_reads_s2_file1_part2.fq").is_file());
    assert!(!dir.path().join("split_output_reads_s2_file1_part3.fq").exists());
    for s in 1..=2 {
        for mate in 0..2 {
            let merged = fs::read_to_string(dir.path().join(format!("merge_output_reads_s{s}_file{mate}.fq"))).unwrap();
            let expected: String = (0..5).map(|i| record(s, mate, i, "IIIII")).collect();
            assert_eq!(merged, expected);
        }
    }
    assert_eq!(results[3].counters().get("checked data"), Some(&2));
    assert!(workflow.steps().all(|s| s.state() == StepState::Done));
}

#[test]
fn malformed_reads_fail_the_checker_step() {
    let dir = tempdir().unwrap();
    let config = EngineConfig { working_directory: dir.path().to_path_buf(), local_threads: 1, ..EngineConfig::default() };
    let (modules, formats) = registries();
    let mut workflow = build(&config, &modules, &formats, "1");

    let results = LocalRunner::new(&config).unwrap().run(&mut workflow).unwrap();
    assert_eq!(results.len(), 4);
    assert!(results[..3].iter().all(StepResult::is_success));
    let failure = results[3].first_failure().unwrap();
    assert!(matches!(failure.exception().map(|e| &**e), Some(TaskError::CheckFailed { data, .. }) if data == "s1"));
    assert_eq!(workflow.step("check").unwrap().state(), StepState::Failed);

    let report = results[3].to_json();
    assert_eq!(report["failed"], serde_json::json!(1));
}
