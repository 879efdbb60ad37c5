use crate::render::intersection::IntersecComputations;

pub mod point_light;

/// Approximation of the Fresnel effect: the fraction of light reflected at the hit.
pub fn schlick_reflectance(comps: &IntersecComputations) -> f64 {
    let n1 = comps.refractive_from();
    let n2 = comps.refractive_to();

    let mut cos = comps.eye_v().dot(comps.normal_v());

    if n1 > n2 {
        let ratio = n1 / n2;
        let sin2_t = ratio.powi(2) * (1. - cos.powi(2));
        // total internal reflection
        if sin2_t > 1. {
            return 1.;
        }
        cos = (1. - sin2_t).sqrt();
    }

    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1. - r0) * (1. - cos).powi(5)
}
