//! Meshes and models: CPU-side vertex data, skeletons and materials.
//!
//! A [`Model`] is a collection of [`Mesh`] instances sharing one
//! [`TextureRegistry`] and, for animated models, one scene [`NodeTree`] and
//! [`Animation`]. Meshes keep their vertex data until [`Mesh::upload`] moves
//! it into a [`BufferStore`]; from then on they only hold buffer handles.

use std::collections::HashMap;
use std::mem;
use std::path::Path;

use crate::animation::{self, Animation, NodeTree, Skeleton};
use crate::buffer::{BoneWeights, BufferStore};
use crate::error::{LoadError, RenderError};
use crate::light::PointLight;
use crate::material::Material;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::render::{DrawParams, MeshBuffers, Primitive, Renderer, Shader, Uniforms};
use crate::texture::TextureRegistry;

/// One drawable piece of a model.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    colors: Vec<Vec4>,
    indices: Vec<[u32; 3]>,
    bone_weights: BoneWeights,
    skeleton: Skeleton,
    material: Material,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            name: name.into(),
            positions,
            indices,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ============ Vertex Data ============

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) {
        self.normals = normals;
    }

    pub fn set_uvs(&mut self, uvs: Vec<Vec2>) {
        self.uvs = uvs;
    }

    pub fn set_colors(&mut self, colors: Vec<Vec4>) {
        self.colors = colors;
    }

    /// One influence list per vertex, indexing into [`Mesh::skeleton`].
    pub fn set_bone_weights(&mut self, bone_weights: BoneWeights) {
        self.bone_weights = bone_weights;
    }

    // ============ Skeleton & Material ============

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    // ============ GPU-style Upload ============

    /// Handles of the uploaded buffers, if [`Mesh::upload`] has run.
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    /// Moves the vertex data into `store` and remembers the handles.
    ///
    /// The mesh's own vectors are left empty. Attributes the mesh never had
    /// are not uploaded. Uploading twice returns the first handles.
    pub fn upload(&mut self, store: &mut BufferStore) -> MeshBuffers {
        if let Some(buffers) = self.buffers {
            return buffers;
        }
        let mut buffers = MeshBuffers::new(
            store.add_positions(mem::take(&mut self.positions)),
            store.add_indices(mem::take(&mut self.indices)),
        );
        if !self.normals.is_empty() {
            buffers.normals = Some(store.add_normals(mem::take(&mut self.normals)));
        }
        if !self.uvs.is_empty() {
            buffers.uvs = Some(store.add_uvs(mem::take(&mut self.uvs)));
        }
        if !self.colors.is_empty() {
            buffers.colors = Some(store.add_colors(mem::take(&mut self.colors)));
        }
        if !self.bone_weights.is_empty() {
            buffers.bone_weights = Some(store.add_bone_weights(mem::take(&mut self.bone_weights)));
        }
        self.buffers = Some(buffers);
        buffers
    }

    /// Builds the draw call for this mesh.
    ///
    /// With a scene and animation the skeleton is posed at `seconds` first;
    /// otherwise the bones keep their current transforms. Returns `None`
    /// until the mesh has been uploaded.
    pub fn draw_params(
        &mut self,
        uniforms: Uniforms,
        pose: Option<(&NodeTree, &Animation)>,
        seconds: f32,
    ) -> Option<DrawParams> {
        let buffers = self.buffers?;
        if let Some((tree, clip)) = pose {
            animation::evaluate(tree, clip, &mut self.skeleton, seconds);
        }
        let mut params = DrawParams::new(buffers, uniforms);
        params.bone_transforms = self.skeleton.final_transforms();
        params.material = self.material;
        Some(params)
    }
}

/// A 3D model containing one or more meshes.
#[derive(Debug, Default)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    mesh_names: HashMap<String, usize>,
    scene: Option<NodeTree>,
    animation: Option<Animation>,
    textures: TextureRegistry,
}

impl Model {
    /// Create a new empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a static model from an OBJ file.
    ///
    /// Faces are triangulated and every vertex gets a single index shared by
    /// all attributes. Missing normals and UVs are filled with zeros.
    /// Material textures are resolved relative to the OBJ's directory; a
    /// texture that fails to load leaves the material's constant colour in
    /// place.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (objects, materials) = tobj::load_obj(path, &options)?;
        let materials = materials.unwrap_or_else(|err| {
            log::warn!("{}: no materials ({err})", path.display());
            Vec::new()
        });

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut model = Model::new(name);
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let materials: Vec<Material> = materials
            .iter()
            .map(|m| import_material(m, base, &mut model.textures))
            .collect();

        for object in objects {
            let mut mesh = import_mesh(&object.name, &object.mesh)?;
            if let Some(material) = object.mesh.material_id.and_then(|i| materials.get(i)) {
                mesh.set_material(*material);
            }
            model.add_mesh(mesh);
        }

        if model.meshes.is_empty() {
            return Err(LoadError::MissingData(format!(
                "{} contains no meshes",
                path.display()
            )));
        }
        log::info!(
            "imported {} ({} meshes, {} textures)",
            path.display(),
            model.meshes.len(),
            model.textures.len()
        );
        Ok(model)
    }

    /// Get the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ============ Mesh Access ============

    /// Get a mesh by name.
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.mesh_names.get(name).and_then(|&i| self.meshes.get(i))
    }

    /// Get a mutable reference to a mesh by name.
    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        let index = self.mesh_names.get(name).copied()?;
        self.meshes.get_mut(index)
    }

    /// Get all meshes as a slice.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Add a mesh to this model.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        let index = self.meshes.len();
        self.mesh_names.insert(mesh.name().to_string(), index);
        self.meshes.push(mesh);
    }

    // ============ Textures & Animation ============

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureRegistry {
        &mut self.textures
    }

    /// Attaches a scene hierarchy and the clip that drives it.
    pub fn set_animation(&mut self, scene: NodeTree, animation: Animation) {
        self.scene = Some(scene);
        self.animation = Some(animation);
    }

    pub fn scene(&self) -> Option<&NodeTree> {
        self.scene.as_ref()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    // ============ Drawing ============

    /// Uploads every mesh that has not been uploaded yet.
    pub fn upload(&mut self, store: &mut BufferStore) {
        for mesh in &mut self.meshes {
            mesh.upload(store);
        }
    }

    /// Draws every uploaded mesh at `seconds` of animation playback.
    ///
    /// A mesh the renderer rejects is logged and skipped; the remaining
    /// meshes are still drawn. Returns the first rejection, if any.
    pub fn draw<S: Shader + ?Sized>(
        &mut self,
        renderer: &mut Renderer,
        shader: &S,
        uniforms: Uniforms,
        lights: &[PointLight],
        primitive: Primitive,
        seconds: f32,
    ) -> Result<(), RenderError> {
        let pose = self.scene.as_ref().zip(self.animation.as_ref());
        let mut first_error = None;
        for mesh in &mut self.meshes {
            let Some(mut params) = mesh.draw_params(uniforms, pose, seconds) else {
                log::warn!("mesh {:?} was never uploaded, skipping", mesh.name);
                continue;
            };
            params.lights = lights.to_vec();
            params.primitive = primitive;
            if let Err(err) = renderer.draw(&params, shader, &self.textures) {
                log::error!("mesh {:?} skipped: {err}", mesh.name);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn import_mesh(name: &str, mesh: &tobj::Mesh) -> Result<Mesh, LoadError> {
    if mesh.indices.len() % 3 != 0 {
        return Err(LoadError::MissingData(format!(
            "mesh {name:?} has {} indices, not a whole number of triangles",
            mesh.indices.len()
        )));
    }
    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let count = positions.len();
    let indices = mesh
        .indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    let mut result = Mesh::new(name, positions, indices);

    result.set_normals(if mesh.normals.len() == count * 3 {
        mesh.normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .collect()
    } else {
        vec![Vec3::ZERO; count]
    });
    result.set_uvs(if mesh.texcoords.len() == count * 2 {
        mesh.texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0], t[1]))
            .collect()
    } else {
        vec![Vec2::ZERO; count]
    });
    if mesh.vertex_color.len() == count * 3 {
        result.set_colors(
            mesh.vertex_color
                .chunks_exact(3)
                .map(|c| Vec4::new(c[0], c[1], c[2], 1.0))
                .collect(),
        );
    }
    Ok(result)
}

fn import_material(source: &tobj::Material, base: &Path, textures: &mut TextureRegistry) -> Material {
    let defaults = Material::default();
    let color = |c: Option<[f32; 3]>, fallback: Vec3| c.map_or(fallback, |[r, g, b]| Vec3::new(r, g, b));

    let mut load = |file: &Option<String>| {
        let file = file.as_deref().filter(|f| !f.is_empty())?;
        let path = base.join(file);
        textures
            .load(&path)
            .map_err(|err| log::warn!("material {:?}: {}: {err}", source.name, path.display()))
            .ok()
    };

    Material {
        ambient: color(source.ambient, defaults.ambient),
        diffuse: color(source.diffuse, defaults.diffuse),
        specular: color(source.specular, defaults.specular),
        shininess: source.shininess.unwrap_or(defaults.shininess),
        diffuse_texture: load(&source.diffuse_texture),
        specular_texture: load(&source.specular_texture),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Keyframe, NodeChannel};
    use crate::buffer::VertexWeight;
    use crate::math::mat4::Mat4;
    use crate::math::quat::Quat;
    use std::fs;

    fn triangle() -> Mesh {
        Mesh::new(
            "tri",
            vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn upload_moves_data_into_store() {
        let mut store = BufferStore::new();
        let mut mesh = triangle();
        mesh.set_normals(vec![Vec3::BACK; 3]);

        let buffers = mesh.upload(&mut store);
        assert!(mesh.positions().is_empty());
        assert!(mesh.indices().is_empty());
        assert_eq!(store.positions(buffers.positions).map(<[_]>::len), Some(3));
        assert!(buffers.normals.is_some());
        assert!(buffers.uvs.is_none());
        assert!(buffers.bone_weights.is_none());

        // a second upload hands back the same handles
        assert_eq!(mesh.upload(&mut store), buffers);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn draw_params_need_an_upload() {
        let uniforms = Uniforms::new(Mat4::identity(), Mat4::identity(), 0.1, 10.0)
            .expect("invertible");
        let mut mesh = triangle();
        assert!(mesh.draw_params(uniforms, None, 0.0).is_none());

        mesh.upload(&mut BufferStore::new());
        let params = mesh.draw_params(uniforms, None, 0.0).expect("uploaded");
        assert!(params.bone_transforms.is_empty());
        assert_eq!(params.material, Material::default());
    }

    #[test]
    fn draw_params_pose_the_skeleton() {
        let uniforms = Uniforms::new(Mat4::identity(), Mat4::identity(), 0.1, 10.0)
            .expect("invertible");
        let mut mesh = triangle();
        mesh.skeleton_mut().add_bone("root", Mat4::identity());
        mesh.set_bone_weights(vec![vec![VertexWeight::new(0, 1.0)]; 3]);
        mesh.upload(&mut BufferStore::new());

        let scene = NodeTree::new("root", Mat4::identity());
        let mut clip = Animation::new("move", 1.0, 10.0);
        let mut channel = NodeChannel::new("root");
        channel.positions = vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(10.0, Vec3::new(10.0, 0.0, 0.0)),
        ];
        channel.rotations = vec![Keyframe::new(0.0, Quat::IDENTITY)];
        clip.add_channel(channel);

        let params = mesh
            .draw_params(uniforms, Some((&scene, &clip)), 4.0)
            .expect("uploaded");
        assert_eq!(params.bone_transforms, vec![Mat4::translation(4.0, 0.0, 0.0)]);
    }

    #[test]
    fn rejected_mesh_does_not_stop_the_rest() {
        use crate::colors::WHITE;
        use crate::render::FlatShader;

        let mut renderer = Renderer::new(4, 4);
        let mut model = Model::new("scene");

        // weighted to a bone its (empty) skeleton does not have
        let mut bad = triangle();
        bad.name = "bad".into();
        bad.set_bone_weights(vec![vec![VertexWeight::new(0, 1.0)]; 3]);
        model.add_mesh(bad);
        model.add_mesh(Mesh::new(
            "good",
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(3.0, -1.0, 0.0),
                Vec3::new(-1.0, 3.0, 0.0),
            ],
            vec![[0, 1, 2]],
        ));
        model.upload(renderer.buffers_mut());

        let uniforms = Uniforms::new(Mat4::identity(), Mat4::identity(), 1.0, 3.0)
            .expect("invertible");
        let err = model
            .draw(
                &mut renderer,
                &FlatShader::new(WHITE),
                uniforms,
                &[],
                Primitive::Triangle,
                0.0,
            )
            .unwrap_err();
        assert_eq!(err, RenderError::BoneOutOfRange { vertex: 0, bone: 0, bones: 0 });
        assert!(renderer.render_target().pixels().iter().all(|&p| p == 0xFFFFFFFF));
    }

    #[test]
    fn meshes_are_found_by_name() {
        let mut model = Model::new("scene");
        model.add_mesh(triangle());
        model.add_mesh(Mesh::new("empty", Vec::new(), Vec::new()));
        assert_eq!(model.meshes().len(), 2);
        assert_eq!(model.mesh("tri").map(Mesh::name), Some("tri"));
        assert!(model.mesh_mut("missing").is_none());
    }

    #[test]
    fn obj_import_fills_missing_attributes() {
        let dir = std::env::temp_dir().join(format!("skinraster-obj-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("quad.obj");
        fs::write(
            &path,
            "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .expect("write obj");

        let model = Model::from_obj(&path).expect("valid obj");
        assert_eq!(model.name(), "quad");
        let mesh = model.mesh("quad").expect("named mesh");
        assert_eq!(mesh.positions().len(), 4);
        assert_eq!(mesh.indices().len(), 2);
        assert_eq!(mesh.normals, vec![Vec3::ZERO; 4]);
        assert_eq!(mesh.uvs, vec![Vec2::ZERO; 4]);
        assert_eq!(*mesh.material(), Material::default());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_obj_is_an_error() {
        let err = Model::from_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, LoadError::Obj(_)));
    }
}
