// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 职位信息提取指令模板

const EXTRACTION_TEMPLATE: &str = r#"
Extract the details of this job listing as structured data, as precisely as possible.

1. Identification:
- Exact job title
- Hiring company name
- Company industry or sector

2. Overview:
- A 2-3 sentence summary of the role's core purpose
- Employment type: Full-time / Part-time / Contract / Casual / Internship
- Work arrangement: On-site / Remote / Hybrid
- Geographic location (city, state, country)

3. Compensation and Benefits:
- Salary range or other compensation details
- Every benefit mentioned (health, retirement, equity, etc.)
- Signing bonuses or performance incentives

4. Description:
A. Responsibilities:
- Every specific responsibility, as a numbered list
- Ordered from most to least critical
- Each phrased with an action verb

B. Requirements:
- Minimum education
- Required years of experience
- Technical skills
- Soft skills
- Which qualifications are required and which are preferred

C. Preferred Qualifications:
- Skills that would make a candidate stand out
- Advanced certifications
- Specialized knowledge or experience

5. Context:
- Company culture
- Growth opportunities
- Reporting structure
- Career progression

6. Application:
- Application deadline
- How to apply
- Required application materials

Rules:
- Be precise and factual
- Use ONLY information present in the listing, never infer
- Write 'Not specified' for any field the listing does not mention
- Keep the original language and tone of the listing

Original User Prompt: {task}
"#;

/// 将调用方的任务描述嵌入固定的提取指令
///
/// 纯字符串模板，对任何任务文本（包括空字符串）行为一致
pub fn enhance_prompt(task: &str) -> String {
    EXTRACTION_TEMPLATE.replacen("{task}", task, 1)
}
