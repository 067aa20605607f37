mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Related, Sanitizer, Search, Service, Suggestions};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::invalid("service.log_level", "must be non-empty."));
	}
	if cfg.search.min_query_chars == 0 {
		return Err(Error::invalid("search.min_query_chars", "must be greater than zero."));
	}
	if cfg.search.timeout_ms == 0 {
		return Err(Error::invalid("search.timeout_ms", "must be greater than zero."));
	}
	if cfg.search.debounce_ms >= cfg.search.timeout_ms {
		return Err(Error::invalid(
			"search.debounce_ms",
			"must be less than search.timeout_ms.",
		));
	}

	for (label, default_limit, max_limit) in [
		("suggestions", cfg.suggestions.default_limit, cfg.suggestions.max_limit),
		("related", cfg.related.default_limit, cfg.related.max_limit),
	] {
		if default_limit == 0 {
			return Err(Error::invalid(
				format!("{label}.default_limit"),
				"must be greater than zero.",
			));
		}
		if max_limit < default_limit {
			return Err(Error::invalid(
				format!("{label}.max_limit"),
				format!("must be at least {label}.default_limit."),
			));
		}
	}

	if cfg.suggestions.fetch_multiplier == 0 {
		return Err(Error::invalid("suggestions.fetch_multiplier", "must be greater than zero."));
	}
	if cfg.related.candidate_k == 0 {
		return Err(Error::invalid("related.candidate_k", "must be greater than zero."));
	}
	if cfg.related.max_terms == 0 {
		return Err(Error::invalid("related.max_terms", "must be greater than zero."));
	}
	if !cfg.related.highly_relevant_threshold.is_finite() {
		return Err(Error::invalid(
			"related.highly_relevant_threshold",
			"must be a finite number.",
		));
	}
	if !(0.0..=1.0).contains(&cfg.related.highly_relevant_threshold) {
		return Err(Error::invalid(
			"related.highly_relevant_threshold",
			"must be in the range 0.0-1.0.",
		));
	}

	let mut weight_sum = 0.0_f32;

	for (label, weight) in [
		("related.category_weight", cfg.related.category_weight),
		("related.document_type_weight", cfg.related.document_type_weight),
		("related.lexical_weight", cfg.related.lexical_weight),
		("related.reference_weight", cfg.related.reference_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::invalid(label, "must be a finite number."));
		}
		if weight < 0.0 {
			return Err(Error::invalid(label, "must be zero or greater."));
		}

		weight_sum += weight;
	}

	if weight_sum <= 0.0 {
		return Err(Error::invalid("related", "weights must not all be zero."));
	}
	if cfg.sanitizer.preview_chars == 0 {
		return Err(Error::invalid("sanitizer.preview_chars", "must be greater than zero."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.sanitizer.link_rel.as_deref().map(|rel| rel.trim().is_empty()).unwrap_or(false) {
		cfg.sanitizer.link_rel = None;
	}

	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
