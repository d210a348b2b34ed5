//! Mouse and keyboard interaction for the 3D scene view.
//!
//! [`MatrixInteractorLogic`] holds the gesture math. The concrete logics
//! apply it to the camera, the model, the sun or the environment lighting,
//! and [`Interactors`] routes input to whichever mode is active.

mod camera;
mod dispatcher;
mod ibl;
mod interactors;
mod light;
mod matrix;
mod model;

pub use camera::CameraInteractorLogic;
pub use dispatcher::{Controls, Interactors};
pub use ibl::IblRotationInteractorLogic;
pub use interactors::{
    FlyInteractor, IblInteractor, InteractorContext, ModelRotationInteractor, MouseInteractor,
    OrbitCameraInteractor, RotationInteractor, RotationLogic, SunInteractor,
};
pub use light::LightDirectionInteractorLogic;
pub use matrix::{DragType, MatrixInteractorLogic};
pub use model::ModelInteractorLogic;
