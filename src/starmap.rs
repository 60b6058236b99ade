//! Instanced WebGL2 star field with animated nebulae and click-triggered
//! shooting stars. The star set is immutable after construction (no pooling
//! needed); shooting stars are the one non-pooled, dynamically created path
//! and therefore dispose their GPU buffers explicitly on completion.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use glam::Mat4;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::constants::STAR_PALETTE;
use crate::device::RenderTier;
use crate::rng;

/// Pointer inactivity after which auto-rotate takes over (ms).
const IDLE_MS: f64 = 5000.0;
/// Shooting-star lifetime ceiling (sec).
const SHOOTING_STAR_MAX_AGE: f64 = 2.0;
/// Exponential smoothing factor for the parallax camera.
const CAM_SMOOTHING: f64 = 0.05;
/// Fragment-cost bound on high-DPI displays.
const MAX_DPR: f64 = 2.0;

const STAR_VS: &str = r#"#version 300 es
layout(location = 0) in vec2 a_corner;
layout(location = 1) in vec3 a_pos;
layout(location = 2) in float a_scale;
layout(location = 3) in vec3 a_color;
layout(location = 4) in vec3 a_twinkle; // speed, phase, base opacity
uniform mat4 u_proj;
uniform mat4 u_view;
uniform mat4 u_model;
uniform float u_time;
out vec2 v_uv;
out vec3 v_color;
out float v_alpha;
void main() {
    vec4 center = u_view * u_model * vec4(a_pos, 1.0);
    center.xy += a_corner * a_scale;
    gl_Position = u_proj * center;
    v_uv = a_corner;
    v_color = a_color;
    v_alpha = a_twinkle.z * (0.55 + 0.45 * sin(u_time * a_twinkle.x + a_twinkle.y));
}
"#;

const STAR_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
in vec3 v_color;
in float v_alpha;
out vec4 frag;
void main() {
    float d = length(v_uv);
    float fall = smoothstep(1.0, 0.0, d);
    frag = vec4(v_color * v_alpha * fall * fall, 1.0);
}
"#;

const NEBULA_VS: &str = r#"#version 300 es
layout(location = 0) in vec2 a_corner;
uniform mat4 u_proj;
uniform mat4 u_view;
uniform vec3 u_center;
uniform float u_scale;
out vec2 v_uv;
void main() {
    vec4 center = u_view * vec4(u_center, 1.0);
    center.xy += a_corner * u_scale;
    gl_Position = u_proj * center;
    v_uv = a_corner;
}
"#;

const NEBULA_FS: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform vec3 u_color;
uniform float u_opacity;
out vec4 frag;
void main() {
    float d = length(v_uv);
    float fall = smoothstep(1.0, 0.0, d);
    frag = vec4(u_color * u_opacity * fall * fall * fall, 1.0);
}
"#;

const LINE_VS: &str = r#"#version 300 es
layout(location = 0) in float a_t;
uniform vec2 u_start;
uniform vec2 u_end;
uniform float u_progress;
void main() {
    float t = clamp(u_progress - a_t * 0.12, 0.0, 1.0);
    vec2 p = mix(u_start, u_end, t);
    gl_Position = vec4(p, 0.0, 1.0);
}
"#;

const LINE_FS: &str = r#"#version 300 es
precision mediump float;
uniform float u_opacity;
out vec4 frag;
void main() {
    frag = vec4(vec3(0.85, 0.95, 1.0) * u_opacity, 1.0);
}
"#;

struct Nebula {
    orbit_angle: f64,
    orbit_radius: f64,
    height: f64,
    depth: f64,
    scale: f32,
    color: (f32, f32, f32),
    angular_speed: f64,
    pulse_speed: f64,
    pulse_phase: f64,
}

/// Ephemeral, non-pooled click streak. Owns its GPU buffer; removal must
/// delete it or the buffer leaks for the page lifetime.
struct ShootingStar {
    buf: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    start: (f32, f32),
    end: (f32, f32),
    age: f64,
    duration: f64,
}

pub struct StarMap {
    gl: Gl,
    canvas: HtmlCanvasElement,
    tier: RenderTier,

    star_program: WebGlProgram,
    star_vao: WebGlVertexArrayObject,
    quad_buf: WebGlBuffer,
    inst_buf: WebGlBuffer,
    star_count: usize,
    u_star_proj: Option<WebGlUniformLocation>,
    u_star_view: Option<WebGlUniformLocation>,
    u_star_model: Option<WebGlUniformLocation>,
    u_star_time: Option<WebGlUniformLocation>,

    nebula_program: WebGlProgram,
    nebula_vao: WebGlVertexArrayObject,
    u_neb_proj: Option<WebGlUniformLocation>,
    u_neb_view: Option<WebGlUniformLocation>,
    u_neb_center: Option<WebGlUniformLocation>,
    u_neb_scale: Option<WebGlUniformLocation>,
    u_neb_color: Option<WebGlUniformLocation>,
    u_neb_opacity: Option<WebGlUniformLocation>,
    nebulae: Vec<Nebula>,

    line_program: WebGlProgram,
    u_line_start: Option<WebGlUniformLocation>,
    u_line_end: Option<WebGlUniformLocation>,
    u_line_progress: Option<WebGlUniformLocation>,
    u_line_opacity: Option<WebGlUniformLocation>,
    shooting: Vec<ShootingStar>,

    // Camera state
    width: f64,
    height: f64,
    rot: f64,
    cam_x: f64,
    cam_y: f64,
    pointer_x: f64,
    pointer_y: f64,
    last_pointer_ms: f64,
}

pub type SharedStarMap = Rc<RefCell<Option<StarMap>>>;

fn compile_shader(gl: &Gl, kind: u32, src: &str) -> Option<WebGlShader> {
    let shader = gl.create_shader(kind)?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Some(shader)
    } else {
        log::error!(
            "shader compile failed: {}",
            gl.get_shader_info_log(&shader).unwrap_or_default()
        );
        gl.delete_shader(Some(&shader));
        None
    }
}

fn link_program(gl: &Gl, vs: &str, fs: &str) -> Option<WebGlProgram> {
    let vert = compile_shader(gl, Gl::VERTEX_SHADER, vs)?;
    let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, fs)?;
    let program = gl.create_program()?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Some(program)
    } else {
        log::error!(
            "program link failed: {}",
            gl.get_program_info_log(&program).unwrap_or_default()
        );
        gl.delete_program(Some(&program));
        None
    }
}

fn upload_f32(gl: &Gl, target: u32, data: &[f32]) {
    let view = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(target, &view, Gl::STATIC_DRAW);
}

impl StarMap {
    /// Feature-probe the canvas for WebGL2 and build the whole scene. `None`
    /// means the caller should fall back to the static CSS gradient and skip
    /// all animation for this subsystem.
    pub fn init(canvas: HtmlCanvasElement, tier: RenderTier, w: f64, h: f64) -> Option<StarMap> {
        let gl: Gl = canvas
            .get_context("webgl2")
            .ok()
            .flatten()?
            .dyn_into()
            .ok()?;

        let star_program = link_program(&gl, STAR_VS, STAR_FS)?;
        let nebula_program = link_program(&gl, NEBULA_VS, NEBULA_FS)?;
        let line_program = link_program(&gl, LINE_VS, LINE_FS)?;

        // Shared unit quad, triangle strip
        let quad_buf = gl.create_buffer()?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&quad_buf));
        upload_f32(&gl, Gl::ARRAY_BUFFER, &[-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);

        // Per-instance star attributes: position, scale, color, twinkle.
        // Set once at creation, never reallocated.
        let mut inst = Vec::with_capacity(tier.stars * 10);
        for _ in 0..tier.stars {
            // Random direction on the unit sphere, shell radius 400-1200,
            // pushed back along the view axis
            let theta = rng::random() * PI * 2.0;
            let z = rng::random() * 2.0 - 1.0;
            let planar = (1.0 - z * z).sqrt();
            let r = rng::range(400.0, 1200.0);
            let px = (planar * theta.cos() * r) as f32;
            let py = (planar * theta.sin() * r) as f32;
            let pz = (z * r - 900.0) as f32;

            let scale = rng::range(0.8, 3.2) as f32;
            let (cr, cg, cb) = STAR_PALETTE[(rng::random() * 5.0) as usize % 5];
            let speed = rng::range(0.5, 2.5) as f32;
            let phase = (rng::random() * PI * 2.0) as f32;
            let base = rng::range(0.35, 1.0) as f32;

            inst.extend_from_slice(&[px, py, pz, scale, cr, cg, cb, speed, phase, base]);
        }

        let inst_buf = gl.create_buffer()?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&inst_buf));
        upload_f32(&gl, Gl::ARRAY_BUFFER, &inst);

        let star_vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(&star_vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&quad_buf));
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, Gl::FLOAT, false, 0, 0);
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&inst_buf));
        let stride = 10 * 4;
        for (loc, size, offset) in [(1u32, 3i32, 0i32), (2, 1, 12), (3, 3, 16), (4, 3, 28)] {
            gl.enable_vertex_attrib_array(loc);
            gl.vertex_attrib_pointer_with_i32(loc, size, Gl::FLOAT, false, stride, offset);
            gl.vertex_attrib_divisor(loc, 1);
        }
        gl.bind_vertex_array(None);

        let nebula_vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(&nebula_vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&quad_buf));
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, Gl::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let nebula_colors: [(f32, f32, f32); 4] = [
            (0.16, 0.05, 0.35),
            (0.04, 0.12, 0.35),
            (0.30, 0.06, 0.20),
            (0.04, 0.22, 0.24),
        ];
        let nebulae = (0..tier.nebulae)
            .map(|i| Nebula {
                orbit_angle: rng::random() * PI * 2.0,
                orbit_radius: rng::range(200.0, 500.0),
                height: rng::range(-200.0, 200.0),
                depth: rng::range(700.0, 1000.0),
                scale: rng::range(250.0, 450.0) as f32,
                color: nebula_colors[i % nebula_colors.len()],
                angular_speed: rng::range(0.01, 0.04),
                pulse_speed: rng::range(0.3, 0.7),
                pulse_phase: rng::random() * PI * 2.0,
            })
            .collect();

        let u_star_proj = gl.get_uniform_location(&star_program, "u_proj");
        let u_star_view = gl.get_uniform_location(&star_program, "u_view");
        let u_star_model = gl.get_uniform_location(&star_program, "u_model");
        let u_star_time = gl.get_uniform_location(&star_program, "u_time");
        let u_neb_proj = gl.get_uniform_location(&nebula_program, "u_proj");
        let u_neb_view = gl.get_uniform_location(&nebula_program, "u_view");
        let u_neb_center = gl.get_uniform_location(&nebula_program, "u_center");
        let u_neb_scale = gl.get_uniform_location(&nebula_program, "u_scale");
        let u_neb_color = gl.get_uniform_location(&nebula_program, "u_color");
        let u_neb_opacity = gl.get_uniform_location(&nebula_program, "u_opacity");
        let u_line_start = gl.get_uniform_location(&line_program, "u_start");
        let u_line_end = gl.get_uniform_location(&line_program, "u_end");
        let u_line_progress = gl.get_uniform_location(&line_program, "u_progress");
        let u_line_opacity = gl.get_uniform_location(&line_program, "u_opacity");

        let mut map = StarMap {
            u_star_proj,
            u_star_view,
            u_star_model,
            u_star_time,
            u_neb_proj,
            u_neb_view,
            u_neb_center,
            u_neb_scale,
            u_neb_color,
            u_neb_opacity,
            u_line_start,
            u_line_end,
            u_line_progress,
            u_line_opacity,
            gl,
            canvas,
            tier,
            star_program,
            star_vao,
            quad_buf,
            inst_buf,
            star_count: tier.stars,
            nebula_program,
            nebula_vao,
            nebulae,
            line_program,
            shooting: Vec::new(),
            width: w,
            height: h,
            rot: 0.0,
            cam_x: 0.0,
            cam_y: 0.0,
            pointer_x: w / 2.0,
            pointer_y: h / 2.0,
            last_pointer_ms: f64::NEG_INFINITY,
        };
        map.resize(w, h);
        log::info!("star map: {} stars, {} nebulae", map.star_count, map.nebulae.len());
        Some(map)
    }

    /// Idempotent: the next frame simply renders at the new dimensions.
    pub fn resize(&mut self, w: f64, h: f64) {
        let dpr = web_sys::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0)
            .min(MAX_DPR);
        self.width = w;
        self.height = h;
        self.canvas.set_width((w * dpr) as u32);
        self.canvas.set_height((h * dpr) as u32);
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, now_ms: f64) {
        self.pointer_x = x;
        self.pointer_y = y;
        self.last_pointer_ms = now_ms;
    }

    /// Click-triggered streak from the click point to a random far point.
    pub fn spawn_shooting_star(&mut self, x: f64, y: f64) {
        let gl = &self.gl;
        let Some(buf) = gl.create_buffer() else {
            return;
        };
        let Some(vao) = gl.create_vertex_array() else {
            gl.delete_buffer(Some(&buf));
            return;
        };
        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buf));
        upload_f32(gl, Gl::ARRAY_BUFFER, &[0.0, 1.0]);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 1, Gl::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let start = self.to_ndc(x, y);
        let end_angle = rng::random() * PI * 2.0;
        let end = (
            start.0 + (end_angle.cos() * rng::range(0.5, 1.2)) as f32,
            start.1 + (end_angle.sin() * rng::range(0.5, 1.2)) as f32,
        );

        self.shooting.push(ShootingStar {
            buf,
            vao,
            start,
            end,
            age: 0.0,
            duration: rng::range(0.8, 1.6),
        });
    }

    fn to_ndc(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (x / self.width * 2.0 - 1.0) as f32,
            (1.0 - y / self.height * 2.0) as f32,
        )
    }

    pub fn render_frame(&mut self, dt: f64, now_ms: f64) {
        self.animate_camera(dt, now_ms);

        let gl = &self.gl;
        let (pw, ph) = (self.canvas.width() as i32, self.canvas.height() as i32);
        gl.viewport(0, 0, pw, ph);
        gl.clear_color(0.012, 0.012, 0.047, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT);
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::ONE, Gl::ONE);
        gl.disable(Gl::DEPTH_TEST);

        let aspect = (self.width / self.height.max(1.0)) as f32;
        let proj = Mat4::perspective_rh_gl(60f32.to_radians(), aspect, 1.0, 4000.0);
        let view =
            Mat4::from_translation(glam::Vec3::new(-self.cam_x as f32, -self.cam_y as f32, 0.0));
        let model = Mat4::from_rotation_y(self.rot as f32);
        let time = (now_ms / 1000.0) as f32;

        // Stars, one instanced draw
        gl.use_program(Some(&self.star_program));
        gl.uniform_matrix4fv_with_f32_array(self.u_star_proj.as_ref(), false, &proj.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(self.u_star_view.as_ref(), false, &view.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(
            self.u_star_model.as_ref(),
            false,
            &model.to_cols_array(),
        );
        gl.uniform1f(self.u_star_time.as_ref(), time);
        gl.bind_vertex_array(Some(&self.star_vao));
        gl.draw_arrays_instanced(Gl::TRIANGLE_STRIP, 0, 4, self.star_count as i32);
        gl.bind_vertex_array(None);

        // Nebulae: each rotates on its orbit and pulses opacity independently
        gl.use_program(Some(&self.nebula_program));
        gl.uniform_matrix4fv_with_f32_array(self.u_neb_proj.as_ref(), false, &proj.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(self.u_neb_view.as_ref(), false, &view.to_cols_array());
        gl.bind_vertex_array(Some(&self.nebula_vao));
        for n in self.nebulae.iter_mut() {
            n.orbit_angle += n.angular_speed * dt;
            let cx = (n.orbit_angle.cos() * n.orbit_radius) as f32;
            let cz = (-n.depth + n.orbit_angle.sin() * n.orbit_radius * 0.3) as f32;
            let pulse =
                0.5 + 0.5 * ((now_ms / 1000.0) * n.pulse_speed + n.pulse_phase).sin();
            gl.uniform3f(self.u_neb_center.as_ref(), cx, n.height as f32, cz);
            gl.uniform1f(self.u_neb_scale.as_ref(), n.scale);
            gl.uniform3f(self.u_neb_color.as_ref(), n.color.0, n.color.1, n.color.2);
            gl.uniform1f(self.u_neb_opacity.as_ref(), (0.2 + 0.25 * pulse) as f32);
            gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
        }
        gl.bind_vertex_array(None);

        // Shooting stars: advance, draw, and dispose completed ones
        gl.use_program(Some(&self.line_program));
        gl.line_width(2.0);
        let mut i = 0;
        while i < self.shooting.len() {
            let done = {
                let star = &mut self.shooting[i];
                star.age += dt;
                let progress = (star.age / star.duration).min(1.0);

                gl.uniform2f(self.u_line_start.as_ref(), star.start.0, star.start.1);
                gl.uniform2f(self.u_line_end.as_ref(), star.end.0, star.end.1);
                gl.uniform1f(self.u_line_progress.as_ref(), progress as f32);
                gl.uniform1f(self.u_line_opacity.as_ref(), (1.0 - progress) as f32);
                gl.bind_vertex_array(Some(&star.vao));
                gl.draw_arrays(Gl::LINES, 0, 2);
                gl.bind_vertex_array(None);

                progress >= 1.0 || star.age >= SHOOTING_STAR_MAX_AGE
            };
            if done {
                let star = self.shooting.swap_remove(i);
                gl.delete_vertex_array(Some(&star.vao));
                gl.delete_buffer(Some(&star.buf));
            } else {
                i += 1;
            }
        }
    }

    fn animate_camera(&mut self, dt: f64, now_ms: f64) {
        self.rot += 0.02 * dt;

        let pointer_active =
            self.tier.parallax && now_ms - self.last_pointer_ms < IDLE_MS;
        let (target_x, target_y) = if pointer_active {
            (
                (self.pointer_x / self.width.max(1.0) - 0.5) * 80.0,
                (self.pointer_y / self.height.max(1.0) - 0.5) * 50.0,
            )
        } else if self.tier.auto_rotate {
            let t = now_ms / 1000.0;
            ((t * 0.15).sin() * 60.0, (t * 0.11).cos() * 30.0)
        } else {
            (0.0, 0.0)
        };

        self.cam_x += (target_x - self.cam_x) * CAM_SMOOTHING;
        self.cam_y += (target_y - self.cam_y) * CAM_SMOOTHING;
    }

    /// Full GPU teardown. Must run after the loop handle is cancelled so no
    /// further frame touches the disposed context.
    pub fn dispose(self) {
        let gl = &self.gl;
        for star in &self.shooting {
            gl.delete_vertex_array(Some(&star.vao));
            gl.delete_buffer(Some(&star.buf));
        }
        gl.delete_vertex_array(Some(&self.star_vao));
        gl.delete_vertex_array(Some(&self.nebula_vao));
        gl.delete_buffer(Some(&self.quad_buf));
        gl.delete_buffer(Some(&self.inst_buf));
        gl.delete_program(Some(&self.star_program));
        gl.delete_program(Some(&self.nebula_program));
        gl.delete_program(Some(&self.line_program));
        log::info!("star map disposed");
    }
}

/// WebGL unavailable: substitute a static CSS gradient and skip the
/// subsystem entirely (no loop work, no listeners for it).
pub fn apply_css_fallback(container: &web_sys::HtmlElement) {
    let _ = container.style().set_property(
        "background",
        "linear-gradient(180deg, #050514 0%, #0a0a2a 60%, #101035 100%)",
    );
    log::warn!("WebGL2 unavailable, star map falling back to static gradient");
}
