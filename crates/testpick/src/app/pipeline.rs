//! From a raw token to a dotted path.

use std::collections::HashSet;

use anyhow::Result;

use crate::app::classify::classify;
use crate::app::locate::Locator;
use crate::app::normalize::{NormalizeRules, build_dotted_path};
use crate::app::resolve::ClassResolver;
use crate::app::scan::Corpus;
use crate::app::selection::Chooser;
use crate::domain::errors::ResolveError;
use crate::domain::model::{ClassOccurrence, DottedPath, Resolution, TargetKind};
use crate::infra::picker::Picker;

/// Collaborators needed to resolve one target.
pub struct Pipeline<'a> {
    pub corpus: &'a Corpus,
    pub locator: &'a dyn Locator,
    pub resolver: &'a dyn ClassResolver,
    pub chooser: &'a mut dyn Chooser,
    pub picker: &'a mut dyn Picker,
    pub rules: &'a NormalizeRules,
}

impl Pipeline<'_> {
    /// Resolve `token`, or open the picker when there is none.
    pub fn resolve(&mut self, token: Option<&str>) -> Result<Resolution> {
        let token = token.map(str::trim).filter(|token| !token.is_empty());
        let kind = token.map_or(TargetKind::ModuleOrPackage, classify);

        let dotted = match (kind, token) {
            (TargetKind::Method, Some(method)) => self.resolve_method(method)?,
            (TargetKind::Class, Some(class_name)) => self.resolve_class(class_name)?,
            _ => self.resolve_module(token)?,
        };

        tracing::debug!(kind = kind.as_str(), dotted = %dotted, "resolved target");
        Ok(Resolution { kind, dotted })
    }

    fn resolve_method(&mut self, method: &str) -> Result<DottedPath> {
        let file = self.locate_one(method)?;

        let found = self
            .resolver
            .resolve_classes(&self.corpus.root().join(&file), method)?;
        let classes = distinct_classes(found);
        if classes.is_empty() {
            return Err(ResolveError::NoEnclosingClass {
                method: method.to_owned(),
                path: file.into(),
            }
            .into());
        }

        let labels: Vec<String> = classes
            .iter()
            .map(|occurrence| format!("{}: {}", file, occurrence.class_name))
            .collect();
        let index = self
            .chooser
            .choose(&format!("Classes defining `{method}`:"), &labels)?;

        Ok(build_dotted_path(
            &file,
            Some(&classes[index].class_name),
            Some(method),
            self.rules,
        ))
    }

    fn resolve_class(&mut self, class_name: &str) -> Result<DottedPath> {
        let file = self.locate_one(class_name)?;
        Ok(build_dotted_path(&file, Some(class_name), None, self.rules))
    }

    fn resolve_module(&mut self, token: Option<&str>) -> Result<DottedPath> {
        let path = match token.and_then(|token| self.existing_path(token)) {
            Some(path) => path,
            None => self
                .picker
                .pick(&self.corpus.entries(), token)?
                .ok_or(ResolveError::NothingSelected)?,
        };

        // `.` and friends name the root itself, which has no module path.
        let dotted = build_dotted_path(&path, None, None, self.rules);
        if dotted.is_empty() {
            return Err(ResolveError::EmptyTarget { path }.into());
        }
        Ok(dotted)
    }

    /// `token` as a path below the root, with a trailing `/` for directories.
    fn existing_path(&self, token: &str) -> Option<String> {
        let on_disk = self.corpus.root().join(token);
        if on_disk.is_dir() {
            Some(format!("{}/", token.trim_end_matches(['/', '\\'])))
        } else if on_disk.is_file() {
            Some(token.to_owned())
        } else {
            None
        }
    }

    /// Locate files mentioning `token` and settle on one of them.
    fn locate_one(&mut self, token: &str) -> Result<String> {
        let mut candidates = self.locator.locate(token);
        if candidates.is_empty() {
            return Err(ResolveError::NotFound {
                token: token.to_owned(),
            }
            .into());
        }
        let index = self
            .chooser
            .choose(&format!("Files containing `{token}`:"), &candidates)?;
        Ok(candidates.swap_remove(index))
    }
}

/// Collapse occurrences naming the same class, keeping the nearest-first order.
fn distinct_classes(found: Vec<ClassOccurrence>) -> Vec<ClassOccurrence> {
    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|occurrence| seen.insert(occurrence.class_name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::app::resolve::BackwardScanResolver;

    struct FixedLocator(Vec<&'static str>);

    impl Locator for FixedLocator {
        fn locate(&self, _token: &str) -> Vec<String> {
            self.0.iter().map(|path| path.to_string()).collect()
        }
    }

    struct StaticResolver(Vec<&'static str>);

    impl ClassResolver for StaticResolver {
        fn resolve_classes(&self, path: &Path, _method: &str) -> Result<Vec<ClassOccurrence>> {
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(line, name)| ClassOccurrence {
                    path: path.to_path_buf(),
                    class_name: name.to_string(),
                    line: line + 1,
                })
                .collect())
        }
    }

    /// Answers with fixed 0-based indexes and records every listing it was shown.
    #[derive(Default)]
    struct ScriptedChooser {
        answers: Vec<usize>,
        shown: Vec<Vec<String>>,
    }

    impl Chooser for ScriptedChooser {
        fn choose(&mut self, _heading: &str, items: &[String]) -> Result<usize> {
            if items.len() == 1 {
                return Ok(0);
            }
            self.shown.push(items.to_vec());
            Ok(self.answers.remove(0))
        }
    }

    struct NoPicker;

    impl Picker for NoPicker {
        fn pick(&mut self, _entries: &[String], _query: Option<&str>) -> Result<Option<String>> {
            panic!("picker must not open");
        }
    }

    struct FixedPicker(Option<&'static str>, Vec<String>);

    impl Picker for FixedPicker {
        fn pick(&mut self, entries: &[String], _query: Option<&str>) -> Result<Option<String>> {
            self.1 = entries.to_vec();
            Ok(self.0.map(str::to_owned))
        }
    }

    fn rules() -> NormalizeRules {
        NormalizeRules {
            extensions: vec!["py".into()],
            strip_prefixes: Vec::new(),
        }
    }

    #[test]
    fn method_with_single_candidates_needs_no_prompt() -> Result<()> {
        let corpus = Corpus::new("/repo");
        let locator = FixedLocator(vec!["app/billing/tests.py"]);
        let resolver = StaticResolver(vec!["InvoiceTest"]);
        let mut chooser = ScriptedChooser::default();
        let rules = rules();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &locator,
            resolver: &resolver,
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        let resolution = pipeline.resolve(Some("test_total"))?;
        assert_eq!(resolution.kind, TargetKind::Method);
        assert_eq!(
            resolution.dotted.as_str(),
            "app.billing.tests.InvoiceTest.test_total"
        );
        assert!(chooser.shown.is_empty());
        Ok(())
    }

    #[test]
    fn method_disambiguates_files_then_classes() -> Result<()> {
        let corpus = Corpus::new("/repo");
        let locator = FixedLocator(vec!["app/billing/tests.py", "app/orders/tests.py"]);
        let resolver = StaticResolver(vec!["SecondTest", "SecondTest", "FirstTest"]);
        let mut chooser = ScriptedChooser {
            answers: vec![1, 1],
            ..ScriptedChooser::default()
        };
        let rules = rules();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &locator,
            resolver: &resolver,
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        let resolution = pipeline.resolve(Some("test_total"))?;
        assert_eq!(
            resolution.dotted.as_str(),
            "app.orders.tests.FirstTest.test_total"
        );
        let shown = &chooser.shown;
        assert_eq!(shown[0], vec!["app/billing/tests.py", "app/orders/tests.py"]);
        assert_eq!(
            shown[1],
            vec![
                "app/orders/tests.py: SecondTest",
                "app/orders/tests.py: FirstTest"
            ]
        );
        Ok(())
    }

    #[test]
    fn class_target_skips_class_resolution() -> Result<()> {
        let corpus = Corpus::new("/repo");
        let locator = FixedLocator(vec!["app/billing/tests.py"]);
        let mut chooser = ScriptedChooser::default();
        let rules = rules();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &locator,
            resolver: &StaticResolver(Vec::new()),
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        let resolution = pipeline.resolve(Some("InvoiceTest"))?;
        assert_eq!(resolution.kind, TargetKind::Class);
        assert_eq!(resolution.dotted.as_str(), "app.billing.tests.InvoiceTest");
        Ok(())
    }

    #[test]
    fn zero_candidates_is_not_found() {
        let corpus = Corpus::new("/repo");
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        let err = pipeline.resolve(Some("test_missing")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResolveError>(),
            Some(&ResolveError::NotFound {
                token: "test_missing".into()
            })
        );
    }

    #[test]
    fn method_outside_any_class_is_reported() {
        let corpus = Corpus::new("/repo");
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(vec!["tests.py"]),
            resolver: &StaticResolver(Vec::new()),
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        let err = pipeline.resolve(Some("test_free")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::NoEnclosingClass { .. })
        ));
    }

    #[test]
    fn no_token_opens_the_picker() -> Result<()> {
        let temp = tempfile::tempdir()?;
        std::fs::create_dir_all(temp.path().join("app/billing"))?;
        std::fs::write(temp.path().join("app/billing/tests.py"), "")?;

        let corpus = Corpus::new(temp.path());
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut picker = FixedPicker(Some("app/billing/"), Vec::new());
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut picker,
            rules: &rules,
        };

        let resolution = pipeline.resolve(None)?;
        assert_eq!(resolution.kind, TargetKind::ModuleOrPackage);
        assert_eq!(resolution.dotted.as_str(), "app.billing");
        assert_eq!(
            picker.1,
            vec!["app/", "app/billing/", "app/billing/tests.py"]
        );
        Ok(())
    }

    #[test]
    fn aborted_picker_selects_nothing() {
        let corpus = Corpus::new("/repo");
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut picker = FixedPicker(None, Vec::new());
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut picker,
            rules: &rules,
        };

        let err = pipeline.resolve(Some("   ")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResolveError>(),
            Some(&ResolveError::NothingSelected)
        );
    }

    #[test]
    fn existing_path_token_skips_the_picker() -> Result<()> {
        let temp = tempfile::tempdir()?;
        std::fs::create_dir_all(temp.path().join("app/billing"))?;
        std::fs::write(temp.path().join("app/billing/invoices.py"), "")?;

        let corpus = Corpus::new(temp.path());
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        assert_eq!(
            pipeline.resolve(Some("app/billing"))?.dotted.as_str(),
            "app.billing"
        );
        assert_eq!(
            pipeline.resolve(Some("app/billing/invoices.py"))?.dotted.as_str(),
            "app.billing.invoices"
        );
        Ok(())
    }

    #[test]
    fn root_directory_has_no_module_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let corpus = Corpus::new(temp.path());
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut NoPicker,
            rules: &rules,
        };

        for token in [".", "./"] {
            let err = pipeline.resolve(Some(token)).unwrap_err();
            assert_eq!(
                err.downcast_ref::<ResolveError>(),
                Some(&ResolveError::EmptyTarget { path: "./".into() })
            );
        }
        Ok(())
    }

    #[test]
    fn picker_selection_of_the_root_is_rejected() {
        let corpus = Corpus::new("/repo");
        let rules = rules();
        let mut chooser = ScriptedChooser::default();
        let mut picker = FixedPicker(Some("./"), Vec::new());
        let mut pipeline = Pipeline {
            corpus: &corpus,
            locator: &FixedLocator(Vec::new()),
            resolver: &BackwardScanResolver,
            chooser: &mut chooser,
            picker: &mut picker,
            rules: &rules,
        };

        let err = pipeline.resolve(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResolveError>(),
            Some(&ResolveError::EmptyTarget { path: "./".into() })
        );
    }
}
