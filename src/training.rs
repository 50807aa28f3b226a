//! Training definitions of the linear and adaptive training services.
//!
//! Both services expose the same export/import endpoints; [`TrainingFlavor`] selects which one a
//! call targets.

// self
use crate::{
	_prelude::*,
	client::{ApiRequest, Client},
	config::ServicePaths,
};

const OCTET_STREAM: &str = "application/octet-stream";

/// Training service a definition belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrainingFlavor {
	/// Linear trainings (`kypo-rest-training`).
	#[default]
	Linear,
	/// Adaptive trainings (`kypo-adaptive-training`).
	Adaptive,
}
impl TrainingFlavor {
	/// Resource name reported in [`Error::NotFound`].
	pub const fn resource(self) -> &'static str {
		match self {
			TrainingFlavor::Linear => "training definition",
			TrainingFlavor::Adaptive => "training definition adaptive",
		}
	}

	fn service_path(self, paths: &ServicePaths) -> &str {
		match self {
			TrainingFlavor::Linear => &paths.training_service,
			TrainingFlavor::Adaptive => &paths.adaptive_training_service,
		}
	}
}

/// Exported training definition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDefinition {
	/// Identifier.
	pub id: i64,
	/// Export document, verbatim.
	pub content: String,
}

#[derive(Debug, Deserialize)]
struct ImportedDefinition {
	id: i64,
}

impl Client {
	/// Exports a definition; `404` yields [`Error::NotFound`].
	pub async fn get_training_definition(
		&self,
		flavor: TrainingFlavor,
		definition_id: i64,
	) -> Result<TrainingDefinition> {
		const OPERATION: &str = "get_training_definition";

		let url =
			self.training_url(flavor, &format!("exports/training-definitions/{definition_id}"))?;
		let snapshot = self
			.execute(OPERATION, &ApiRequest::get(url).with_accept(OCTET_STREAM))
			.await?
			.not_found_as(flavor.resource(), definition_id)?
			.expect_status(OPERATION, &[StatusCode::OK])?;

		Ok(TrainingDefinition { id: definition_id, content: snapshot.body })
	}

	/// Imports an export document and returns it with the identifier the service assigned.
	pub async fn create_training_definition(
		&self,
		flavor: TrainingFlavor,
		content: impl Into<String>,
	) -> Result<TrainingDefinition> {
		const OPERATION: &str = "create_training_definition";

		let content = content.into();
		let url = self.training_url(flavor, "imports/training-definitions")?;
		let imported = self
			.execute(OPERATION, &ApiRequest::post(url).with_body(content.clone()))
			.await?
			.expect_status(OPERATION, &[StatusCode::OK])?
			.json::<ImportedDefinition>(OPERATION)?;

		Ok(TrainingDefinition { id: imported.id, content })
	}

	/// Deletes a definition; deleting a missing definition succeeds.
	pub async fn delete_training_definition(
		&self,
		flavor: TrainingFlavor,
		definition_id: i64,
	) -> Result<()> {
		const OPERATION: &str = "delete_training_definition";

		let url = self.training_url(flavor, &format!("training-definitions/{definition_id}"))?;

		self.execute(OPERATION, &ApiRequest::delete(url))
			.await?
			.expect_status(OPERATION, &[StatusCode::OK, StatusCode::NOT_FOUND])?;

		Ok(())
	}

	fn training_url(&self, flavor: TrainingFlavor, path: &str) -> Result<Url> {
		self.config.url(&[flavor.service_path(&self.config.paths), path])
	}
}
